pub mod style;
pub mod widgets;

pub use style::{StyleTokens, LAYOUT_TOKENS};
pub use widgets::{icon_button, labeled_icon_button};
