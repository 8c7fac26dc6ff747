use std::collections::VecDeque;

use super::model::{is_compact_width, LayoutState};

const TRANSITION_HISTORY_LIMIT: usize = 64;

/// Source of the current viewport width.
pub trait Viewport {
    fn width(&self) -> i32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedViewport(pub i32);

impl Viewport for FixedViewport {
    fn width(&self) -> i32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutCause {
    Mount,
    Resize { width: i32 },
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutTransition {
    pub from: LayoutState,
    pub cause: LayoutCause,
    pub to: LayoutState,
}

#[derive(Debug)]
pub struct LayoutManager {
    state: LayoutState,
    transition_history: VecDeque<LayoutTransition>,
}

impl LayoutManager {
    /// Starts expanded and classifies the viewport immediately.
    pub fn mount(viewport: &dyn Viewport) -> Self {
        let mut manager = Self {
            state: LayoutState::default(),
            transition_history: VecDeque::new(),
        };
        manager.apply_viewport_width(viewport.width(), true);
        manager
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    /// Reclassifies the viewport. Observing a compact width always leaves
    /// the panel collapsed.
    pub fn recompute_viewport_class(&mut self, viewport: &dyn Viewport) -> LayoutState {
        self.apply_viewport_width(viewport.width(), false)
    }

    pub fn set_panel_expanded(&mut self, value: bool) -> LayoutState {
        let next = LayoutState {
            panel_expanded: value,
            ..self.state
        };
        self.commit(LayoutCause::Toggle, next)
    }

    pub fn toggle_panel(&mut self) -> LayoutState {
        self.set_panel_expanded(!self.state.panel_expanded)
    }

    pub fn history(&self) -> impl Iterator<Item = &LayoutTransition> {
        self.transition_history.iter()
    }

    fn apply_viewport_width(&mut self, width: i32, mounting: bool) -> LayoutState {
        let is_compact_viewport = is_compact_width(width);
        let panel_expanded = self.state.panel_expanded && !is_compact_viewport;
        if self.state.panel_expanded && !panel_expanded {
            tracing::info!(width, "compact viewport; collapsing navigation panel");
        }

        let cause = if mounting {
            LayoutCause::Mount
        } else {
            LayoutCause::Resize { width }
        };
        self.commit(
            cause,
            LayoutState {
                panel_expanded,
                is_compact_viewport,
            },
        )
    }

    fn commit(&mut self, cause: LayoutCause, next: LayoutState) -> LayoutState {
        if next == self.state {
            return self.state;
        }

        tracing::debug!(from = ?self.state, cause = ?cause, to = ?next, "layout transition");
        if self.transition_history.len() == TRANSITION_HISTORY_LIMIT {
            self.transition_history.pop_front();
        }
        self.transition_history.push_back(LayoutTransition {
            from: self.state,
            cause,
            to: next,
        });
        self.state = next;
        self.state
    }
}

impl std::fmt::Display for LayoutManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NavPresentation::{:?}", self.state.presentation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::NavPresentation;

    #[test]
    fn mount_on_wide_viewport_starts_expanded() {
        let manager = LayoutManager::mount(&FixedViewport(1280));
        assert_eq!(
            manager.state(),
            LayoutState {
                panel_expanded: true,
                is_compact_viewport: false
            }
        );
        assert_eq!(manager.history().count(), 0);
    }

    #[test]
    fn mount_on_compact_viewport_starts_collapsed() {
        let manager = LayoutManager::mount(&FixedViewport(500));
        assert!(manager.state().is_compact_viewport);
        assert!(!manager.state().panel_expanded);
        assert_eq!(manager.history().next().map(|t| t.cause), Some(LayoutCause::Mount));
    }

    #[test]
    fn shrinking_below_breakpoint_forces_collapse() {
        let mut manager = LayoutManager::mount(&FixedViewport(1024));
        let state = manager.recompute_viewport_class(&FixedViewport(400));
        assert!(state.is_compact_viewport);
        assert!(!state.panel_expanded);
        assert_eq!(manager.to_string(), "NavPresentation::Hidden");
    }

    #[test]
    fn growing_past_breakpoint_keeps_panel_collapsed() {
        let mut manager = LayoutManager::mount(&FixedViewport(400));
        let state = manager.recompute_viewport_class(&FixedViewport(1024));
        assert!(!state.is_compact_viewport);
        assert!(!state.panel_expanded);
        assert_eq!(state.presentation(), NavPresentation::Rail);
    }

    #[test]
    fn explicit_expand_while_compact_opens_overlay() {
        let mut manager = LayoutManager::mount(&FixedViewport(400));
        let state = manager.set_panel_expanded(true);
        assert!(state.panel_expanded);
        assert_eq!(state.presentation(), NavPresentation::Overlay);
    }

    #[test]
    fn resize_while_compact_closes_an_open_overlay() {
        let mut manager = LayoutManager::mount(&FixedViewport(400));
        manager.set_panel_expanded(true);
        let state = manager.recompute_viewport_class(&FixedViewport(420));
        assert!(!state.panel_expanded);
    }

    #[test]
    fn compact_observation_leaves_panel_collapsed_unless_expanded_afterwards() {
        let widths = [1200, 900, 700, 760, 800, 300, 1000, 767, 768];
        let mut manager = LayoutManager::mount(&FixedViewport(1440));
        for (step, width) in widths.into_iter().enumerate() {
            if step % 2 == 0 {
                manager.toggle_panel();
            }
            let state = manager.recompute_viewport_class(&FixedViewport(width));
            if width < 768 {
                assert!(!state.panel_expanded, "width {width} left panel expanded");
            }
        }
    }

    #[test]
    fn toggle_flips_expansion_and_records_history() {
        let mut manager = LayoutManager::mount(&FixedViewport(1280));
        manager.toggle_panel();
        manager.toggle_panel();

        let history: Vec<_> = manager.history().copied().collect();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].cause, LayoutCause::Toggle);
        assert!(!history[0].to.panel_expanded);
        assert!(history[1].to.panel_expanded);
    }

    #[test]
    fn unchanged_state_is_not_recorded() {
        let mut manager = LayoutManager::mount(&FixedViewport(1280));
        manager.recompute_viewport_class(&FixedViewport(1300));
        manager.set_panel_expanded(true);
        assert_eq!(manager.history().count(), 0);
    }

    #[test]
    fn history_is_bounded() {
        let mut manager = LayoutManager::mount(&FixedViewport(1280));
        for _ in 0..(TRANSITION_HISTORY_LIMIT + 10) {
            manager.toggle_panel();
        }
        assert_eq!(manager.history().count(), TRANSITION_HISTORY_LIMIT);
    }
}
