use std::cell::RefCell;
use std::rc::Rc;

use crate::color::{ColorTriple, Hsla};

const EMPHASIS_ALPHA: f64 = 0.8;
const SOFT_ALPHA: f64 = 0.2;
const GRADIENT_TOP_OFFSET: f64 = 0.05;
const GRADIENT_BOTTOM_OFFSET: f64 = 0.95;

/// Named style variables written into the shared style scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleVar {
    Brand,
    Primary,
    PrimaryEmphasis,
    FocusRing,
}

impl StyleVar {
    pub const ALL: [StyleVar; 4] = [
        StyleVar::Brand,
        StyleVar::Primary,
        StyleVar::PrimaryEmphasis,
        StyleVar::FocusRing,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            StyleVar::Brand => "brand",
            StyleVar::Primary => "primary",
            StyleVar::PrimaryEmphasis => "primary-emphasis",
            StyleVar::FocusRing => "focus-ring",
        }
    }

    /// Identifier usable in GTK `@define-color` rules.
    pub const fn css_ident(self) -> &'static str {
        match self {
            StyleVar::Brand => "brand",
            StyleVar::Primary => "primary",
            StyleVar::PrimaryEmphasis => "primary_emphasis",
            StyleVar::FocusRing => "focus_ring",
        }
    }

    const fn alpha(self) -> f64 {
        match self {
            StyleVar::Brand | StyleVar::Primary => 1.0,
            StyleVar::PrimaryEmphasis => EMPHASIS_ALPHA,
            StyleVar::FocusRing => SOFT_ALPHA,
        }
    }
}

/// The four variables derived from one primary color. Always complete.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleVars {
    values: [Hsla; 4],
}

impl StyleVars {
    pub fn derive(primary: &ColorTriple) -> Self {
        Self {
            values: StyleVar::ALL.map(|var| primary.with_alpha(var.alpha())),
        }
    }

    pub fn get(&self, var: StyleVar) -> Hsla {
        self.values[var as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleVar, Hsla)> + '_ {
        StyleVar::ALL.into_iter().zip(self.values.iter().copied())
    }
}

/// Target of a style projection. Each `apply` replaces all four variables.
pub trait StyleScope {
    fn apply(&mut self, vars: &StyleVars);
}

/// In-process scope that keeps every projection; clones share the history.
#[derive(Debug, Clone, Default)]
pub struct MemoryStyleScope {
    projections: Rc<RefCell<Vec<StyleVars>>>,
}

impl MemoryStyleScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<StyleVars> {
        self.projections.borrow().last().copied()
    }

    pub fn projection_count(&self) -> usize {
        self.projections.borrow().len()
    }
}

impl StyleScope for MemoryStyleScope {
    fn apply(&mut self, vars: &StyleVars) {
        self.projections.borrow_mut().push(*vars);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Hsla,
}

/// Stroke and area-fill colors of the usage chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPalette {
    pub stroke: Hsla,
    pub fill: [GradientStop; 2],
}

impl ChartPalette {
    pub fn from_primary(primary: &ColorTriple) -> Self {
        Self {
            stroke: primary.with_alpha(1.0),
            fill: [
                GradientStop {
                    offset: GRADIENT_TOP_OFFSET,
                    color: primary.with_alpha(EMPHASIS_ALPHA),
                },
                GradientStop {
                    offset: GRADIENT_BOTTOM_OFFSET,
                    color: primary.with_alpha(SOFT_ALPHA),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BRAND_PRESETS, DEFAULT_BRAND_COLOR};

    #[test]
    fn derive_produces_all_four_variables_from_the_triple() {
        let vars = StyleVars::derive(&DEFAULT_BRAND_COLOR);
        let names: Vec<_> = vars.iter().map(|(var, _)| var.name()).collect();
        assert_eq!(names, ["brand", "primary", "primary-emphasis", "focus-ring"]);

        assert_eq!(
            vars.get(StyleVar::Brand).to_string(),
            "hsla(221.2, 83%, 53.3%, 1)"
        );
        assert_eq!(vars.get(StyleVar::Primary), vars.get(StyleVar::Brand));
        assert_eq!(vars.get(StyleVar::PrimaryEmphasis).alpha, 0.8);
        assert_eq!(vars.get(StyleVar::FocusRing).alpha, 0.2);
    }

    #[test]
    fn css_idents_avoid_hyphens() {
        for var in StyleVar::ALL {
            assert!(!var.css_ident().contains('-'));
        }
    }

    #[test]
    fn memory_scope_tracks_latest_projection() {
        let scope = MemoryStyleScope::new();
        let mut target = scope.clone();
        assert!(scope.current().is_none());

        target.apply(&StyleVars::derive(&DEFAULT_BRAND_COLOR));
        target.apply(&StyleVars::derive(&BRAND_PRESETS[3].color));

        assert_eq!(scope.projection_count(), 2);
        assert_eq!(
            scope.current(),
            Some(StyleVars::derive(&BRAND_PRESETS[3].color))
        );
    }

    #[test]
    fn chart_palette_matches_gradient_stops() {
        let palette = ChartPalette::from_primary(&DEFAULT_BRAND_COLOR);
        assert_eq!(palette.stroke.to_string(), "hsla(221.2, 83%, 53.3%, 1)");
        assert_eq!(palette.fill[0].offset, 0.05);
        assert_eq!(
            palette.fill[0].color.to_string(),
            "hsla(221.2, 83%, 53.3%, 0.8)"
        );
        assert_eq!(palette.fill[1].offset, 0.95);
        assert_eq!(palette.fill[1].color.alpha, 0.2);
    }
}
