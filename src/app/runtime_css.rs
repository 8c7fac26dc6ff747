use std::fmt::Write as _;

use crate::theme::{StyleScope, StyleVars};
use crate::ui::StyleTokens;
use gtk4::CssProvider;

/// Rules that consume the projected `@brand`, `@primary`,
/// `@primary_emphasis` and `@focus_ring` colors.
pub(super) fn install_runtime_css(tokens: StyleTokens, motion_enabled: bool) {
    let motion_standard_ms = if motion_enabled {
        tokens.motion_standard_ms
    } else {
        0
    };
    let css = format!(
        "
window.portal-root {{
  background: @theme_bg_color;
}}
.portal-sidebar {{
  background: alpha(@theme_fg_color, 0.04);
  border-right: 1px solid alpha(@theme_fg_color, 0.10);
  transition: min-width {motion_standard_ms}ms ease-in-out;
}}
.portal-sidebar.overlay {{
  background: @theme_bg_color;
  box-shadow: 0 8px 28px rgba(0, 0, 0, 0.24);
}}
.sidebar-header {{
  padding: {spacing_16}px;
  border-bottom: 1px solid alpha(@theme_fg_color, 0.10);
}}
label.sidebar-title {{
  font-weight: 600;
}}
.brand-monogram {{
  min-width: {monogram_size}px;
  min-height: {monogram_size}px;
  border-radius: {control_radius}px;
  background: @brand;
  color: white;
  font-weight: 700;
}}
button.nav-item {{
  border-radius: {control_radius}px;
  padding: {spacing_8}px {spacing_16}px;
}}
button.nav-item.active {{
  background: @primary;
  color: white;
}}
button.primary-action {{
  background: @primary;
  color: white;
  border-radius: {control_radius}px;
  font-weight: 600;
}}
button.primary-action:hover {{
  background: @primary_emphasis;
}}
button:focus-visible,
entry:focus-within {{
  outline: 2px solid @focus_ring;
  outline-offset: 1px;
}}
.brand-text {{
  color: @primary;
  font-weight: 500;
}}
.nav-scrim {{
  background: rgba(0, 0, 0, 0.5);
}}
.portal-card {{
  border-radius: {card_radius}px;
  border: 1px solid alpha(@theme_fg_color, 0.10);
  padding: {spacing_16}px;
}}
label.card-title {{
  font-size: 15px;
  font-weight: 600;
}}
label.page-title {{
  font-size: 22px;
  font-weight: 700;
}}
button.preset-swatch.selected {{
  outline: 2px solid @theme_fg_color;
}}
.toast-badge {{
  border-radius: {control_radius}px;
  background: @theme_bg_color;
  border: 1px solid alpha(@theme_fg_color, 0.12);
  padding: {spacing_8}px {spacing_16}px;
  box-shadow: 0 4px 16px rgba(0, 0, 0, 0.14);
}}
.toast-badge.error {{
  color: rgba(220, 38, 38, 1);
}}
",
        card_radius = tokens.card_radius,
        control_radius = tokens.control_radius,
        monogram_size = tokens.monogram_size,
        spacing_8 = tokens.spacing_8,
        spacing_16 = tokens.spacing_16,
        motion_standard_ms = motion_standard_ms,
    );

    let provider = CssProvider::new();
    provider.load_from_data(&css);
    if let Some(display) = gtk4::gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

/// Display-wide style scope holding the projected brand colors.
pub(super) struct GtkStyleScope {
    provider: CssProvider,
}

impl GtkStyleScope {
    pub(super) fn install() -> Self {
        let provider = CssProvider::new();
        if let Some(display) = gtk4::gdk::Display::default() {
            gtk4::style_context_add_provider_for_display(
                &display,
                &provider,
                gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION + 1,
            );
        } else {
            tracing::warn!("no display available; brand colors will not be projected");
        }
        Self { provider }
    }
}

impl StyleScope for GtkStyleScope {
    fn apply(&mut self, vars: &StyleVars) {
        self.provider.load_from_data(&style_vars_css(vars));
    }
}

impl Drop for GtkStyleScope {
    fn drop(&mut self) {
        if let Some(display) = gtk4::gdk::Display::default() {
            gtk4::style_context_remove_provider_for_display(&display, &self.provider);
        }
    }
}

/// `@define-color` rules for every variable, in rgba form.
pub(super) fn style_vars_css(vars: &StyleVars) -> String {
    let mut css = String::new();
    for (var, color) in vars.iter() {
        let _ = writeln!(css, "@define-color {} {};", var.css_ident(), color.to_rgba());
    }
    css
}
