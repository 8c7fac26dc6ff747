pub mod manager;
pub mod model;

pub use manager::{FixedViewport, LayoutCause, LayoutManager, LayoutTransition, Viewport};
pub use model::{
    is_compact_width, LayoutState, NavItem, NavPresentation, COMPACT_BREAKPOINT, NAV_ITEMS,
    PANEL_RAIL_WIDTH, PANEL_WIDE_WIDTH,
};
