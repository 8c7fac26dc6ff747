use crate::layout::Viewport;
use gtk4::prelude::*;
use gtk4::ApplicationWindow;

/// The window as the viewport signal source.
pub(super) struct WindowViewport<'a> {
    window: &'a ApplicationWindow,
    fallback_width: i32,
}

impl<'a> WindowViewport<'a> {
    pub(super) fn new(window: &'a ApplicationWindow, fallback_width: i32) -> Self {
        Self {
            window,
            fallback_width,
        }
    }
}

impl Viewport for WindowViewport<'_> {
    fn width(&self) -> i32 {
        resolve_viewport_width(
            self.window.width(),
            self.window.default_width(),
            self.fallback_width,
        )
    }
}

/// The allocated width wins; `default-width` keeps the unmaximized size
/// while the window is maximized, fullscreen or tiled, so it only covers an
/// unrealized window.
fn resolve_viewport_width(allocated_width: i32, default_width: i32, fallback: i32) -> i32 {
    if allocated_width > 0 {
        allocated_width
    } else if default_width > 0 {
        default_width
    } else {
        fallback.max(0)
    }
}
