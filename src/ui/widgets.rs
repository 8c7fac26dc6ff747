use gtk4::prelude::*;
use gtk4::{Box as GtkBox, Button, Image, Label, Orientation};

pub fn icon_button(
    icon_name: &str,
    tooltip: &str,
    control_size: i32,
    extra_classes: &[&str],
) -> Button {
    let button = Button::from_icon_name(icon_name);
    button.set_focus_on_click(false);
    button.set_tooltip_text(Some(tooltip));
    button.add_css_class("flat");
    button.add_css_class("icon-button");
    for css_class in extra_classes {
        button.add_css_class(css_class);
    }
    button.set_size_request(control_size, control_size);
    button
}

/// Flat button holding an icon and a label; the label can be hidden
/// independently for icon-only presentations.
pub fn labeled_icon_button(
    icon_name: &str,
    label: &str,
    icon_size: i32,
    spacing: i32,
    extra_classes: &[&str],
) -> (Button, Label) {
    let content = GtkBox::new(Orientation::Horizontal, spacing);
    let icon = Image::from_icon_name(icon_name);
    icon.set_pixel_size(icon_size);
    let text = Label::new(Some(label));
    text.set_xalign(0.0);
    content.append(&icon);
    content.append(&text);

    let button = Button::new();
    button.set_child(Some(&content));
    button.set_tooltip_text(Some(label));
    button.add_css_class("flat");
    for css_class in extra_classes {
        button.add_css_class(css_class);
    }
    (button, text)
}
