/// Viewports narrower than this are compact.
pub const COMPACT_BREAKPOINT: i32 = 768;
pub const PANEL_WIDE_WIDTH: i32 = 256;
pub const PANEL_RAIL_WIDTH: i32 = 80;

pub fn is_compact_width(width: i32) -> bool {
    width < COMPACT_BREAKPOINT
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutState {
    pub panel_expanded: bool,
    pub is_compact_viewport: bool,
}

impl LayoutState {
    pub const fn presentation(&self) -> NavPresentation {
        match (self.is_compact_viewport, self.panel_expanded) {
            (false, true) => NavPresentation::Wide,
            (false, false) => NavPresentation::Rail,
            (true, true) => NavPresentation::Overlay,
            (true, false) => NavPresentation::Hidden,
        }
    }
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            panel_expanded: true,
            is_compact_viewport: false,
        }
    }
}

/// How the navigation panel is drawn for a given layout state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavPresentation {
    /// Labeled panel that pushes the content.
    Wide,
    /// Icon-only rail.
    Rail,
    /// Labeled panel floating above the content with a dismiss scrim.
    Overlay,
    Hidden,
}

impl NavPresentation {
    pub const fn panel_width(self) -> i32 {
        match self {
            NavPresentation::Wide | NavPresentation::Overlay => PANEL_WIDE_WIDTH,
            NavPresentation::Rail => PANEL_RAIL_WIDTH,
            NavPresentation::Hidden => 0,
        }
    }

    /// Horizontal space the content gives up to the panel.
    pub const fn content_inset(self) -> i32 {
        match self {
            NavPresentation::Wide => PANEL_WIDE_WIDTH,
            NavPresentation::Rail => PANEL_RAIL_WIDTH,
            NavPresentation::Overlay | NavPresentation::Hidden => 0,
        }
    }

    pub const fn shows_labels(self) -> bool {
        matches!(self, NavPresentation::Wide | NavPresentation::Overlay)
    }

    pub const fn has_scrim(self) -> bool {
        matches!(self, NavPresentation::Overlay)
    }

    pub const fn is_compact(self) -> bool {
        matches!(self, NavPresentation::Overlay | NavPresentation::Hidden)
    }

    /// Chevron toggle in the panel header, only on wide viewports.
    pub const fn shows_header_toggle(self) -> bool {
        !self.is_compact()
    }

    /// Label of the bottom menu button shown on compact viewports.
    pub const fn menu_button_label(self) -> Option<&'static str> {
        match self {
            NavPresentation::Overlay => Some("Close Menu"),
            NavPresentation::Hidden => Some("Menu"),
            NavPresentation::Wide | NavPresentation::Rail => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
    pub icon_name: &'static str,
}

pub const NAV_ITEMS: [NavItem; 6] = [
    NavItem {
        label: "Dashboard",
        path: "/",
        icon_name: "go-home-symbolic",
    },
    NavItem {
        label: "API Catalog",
        path: "/apis",
        icon_name: "accessories-dictionary-symbolic",
    },
    NavItem {
        label: "Analytics",
        path: "/analytics",
        icon_name: "utilities-system-monitor-symbolic",
    },
    NavItem {
        label: "Users",
        path: "/users",
        icon_name: "system-users-symbolic",
    },
    NavItem {
        label: "API Keys",
        path: "/keys",
        icon_name: "dialog-password-symbolic",
    },
    NavItem {
        label: "Settings",
        path: "/settings",
        icon_name: "preferences-system-symbolic",
    },
];
