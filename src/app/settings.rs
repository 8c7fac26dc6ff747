use std::cell::Cell;
use std::rc::Rc;

use crate::branding::BrandingPatch;
use crate::color::{subtle_background, ColorTriple, Hsla, BRAND_PRESETS};
use crate::context::PortalHandle;
use crate::ui::StyleTokens;
use gtk4::prelude::*;
use gtk4::{Box as GtkBox, Button, DrawingArea, Entry, FlowBox, Label, Orientation, SelectionMode};

use super::toast::ToastRuntime;

/// Fills the whole area with a color computed at draw time.
fn color_swatch(width: i32, height: i32, color: impl Fn() -> Hsla + 'static) -> DrawingArea {
    let area = DrawingArea::new();
    area.set_content_width(width);
    area.set_content_height(height);
    area.set_draw_func(move |_, cr, width, height| {
        let rgba = color().to_rgba();
        cr.set_source_rgba(rgba.red, rgba.green, rgba.blue, rgba.alpha);
        cr.rectangle(0.0, 0.0, f64::from(width), f64::from(height));
        if let Err(err) = cr.fill() {
            tracing::warn!(?err, "failed to paint color swatch");
        }
    });
    area
}

fn labeled_entry(label: &str, placeholder: &str, value: &str, spacing: i32) -> (GtkBox, Entry) {
    let row = GtkBox::new(Orientation::Vertical, spacing);
    let caption = Label::new(Some(label));
    caption.set_xalign(0.0);
    let entry = Entry::new();
    entry.set_placeholder_text(Some(placeholder));
    entry.set_text(value);
    row.append(&caption);
    row.append(&entry);
    (row, entry)
}

pub(super) fn build_branding_form(
    handle: &PortalHandle,
    tokens: StyleTokens,
    toast: &ToastRuntime,
) -> GtkBox {
    let profile = handle.branding();
    let selected = Rc::new(Cell::new(profile.primary_color));

    let page = GtkBox::new(Orientation::Vertical, tokens.spacing_16);
    let heading = Label::new(Some("Settings"));
    heading.add_css_class("page-title");
    heading.set_xalign(0.0);
    page.append(&heading);

    let card = GtkBox::new(Orientation::Vertical, tokens.spacing_12);
    card.add_css_class("portal-card");
    let card_title = Label::new(Some("Portal Branding"));
    card_title.add_css_class("card-title");
    card_title.set_xalign(0.0);
    let (name_row, name_entry) = labeled_entry(
        "Portal Name",
        "Enter portal name",
        &profile.display_name,
        tokens.spacing_4,
    );
    let (logo_row, logo_entry) = labeled_entry(
        "Logo URL",
        "Enter logo URL or leave blank to use initial",
        &profile.logo_url,
        tokens.spacing_4,
    );
    card.append(&card_title);
    card.append(&name_row);
    card.append(&logo_row);

    let preview = build_preview(tokens, &selected);
    let refresh_preview = {
        let preview = preview.clone();
        move || {
            let mut child = preview.first_child();
            while let Some(widget) = child {
                widget.queue_draw();
                child = widget.next_sibling();
            }
        }
    };

    let presets = FlowBox::new();
    presets.set_selection_mode(SelectionMode::None);
    presets.set_column_spacing(tokens.spacing_8 as u32);
    presets.set_row_spacing(tokens.spacing_8 as u32);
    let mut preset_buttons = Vec::with_capacity(BRAND_PRESETS.len());
    for preset in BRAND_PRESETS {
        let content = GtkBox::new(Orientation::Vertical, tokens.spacing_4);
        content.append(&color_swatch(
            tokens.swatch_width,
            tokens.swatch_height,
            move || preset.color.with_alpha(1.0),
        ));
        content.append(&Label::new(Some(preset.name)));
        let button = Button::new();
        button.set_child(Some(&content));
        button.add_css_class("flat");
        button.add_css_class("preset-swatch");
        if preset.color == selected.get() {
            button.add_css_class("selected");
        }
        presets.insert(&button, -1);
        preset_buttons.push((preset.color, button));
    }
    let mark_selected: Rc<dyn Fn(ColorTriple)> = {
        let preset_buttons = preset_buttons.clone();
        Rc::new(move |color| {
            for (preset_color, button) in &preset_buttons {
                if *preset_color == color {
                    button.add_css_class("selected");
                } else {
                    button.remove_css_class("selected");
                }
            }
        })
    };
    for (color, button) in &preset_buttons {
        let color = *color;
        let selected = selected.clone();
        let mark_selected = mark_selected.clone();
        let refresh_preview = refresh_preview.clone();
        button.connect_clicked(move |_| {
            selected.set(color);
            mark_selected(color);
            refresh_preview();
        });
    }

    let color_title = Label::new(Some("Color Theme"));
    color_title.add_css_class("card-title");
    color_title.set_xalign(0.0);
    let (custom_row, custom_entry) =
        labeled_entry("Custom Color (Hex)", "#3b82f6", "", tokens.spacing_4);
    let apply_custom = Button::with_label("Apply");
    custom_row.append(&apply_custom);
    {
        let custom_entry = custom_entry.clone();
        let selected = selected.clone();
        let toast = toast.clone();
        let mark_selected = mark_selected.clone();
        let refresh_preview = refresh_preview.clone();
        apply_custom.connect_clicked(move |_| {
            match ColorTriple::from_hex(custom_entry.text().as_str()) {
                Ok(color) => {
                    tracing::debug!(%color, "applied custom brand color");
                    selected.set(color);
                    mark_selected(color);
                    refresh_preview();
                    toast.show("Custom color applied");
                }
                Err(err) => {
                    tracing::debug!(?err, "rejected custom brand color");
                    toast.show_error("Please enter a valid hex color code (e.g. #3b82f6)");
                }
            }
        });
    }

    let save = Button::with_label("Save Branding Changes");
    save.add_css_class("primary-action");
    {
        let handle = handle.clone();
        let toast = toast.clone();
        let selected = selected.clone();
        save.connect_clicked(move |_| {
            let patch = BrandingPatch::new()
                .display_name(name_entry.text().as_str())
                .logo_url(logo_entry.text().as_str())
                .primary_color(selected.get());
            let change = handle.update_branding(&patch);
            if change.persisted {
                toast.show("Branding updated");
            } else {
                toast.show_error("Branding applied for this session only");
            }
        });
    }

    card.append(&color_title);
    card.append(&presets);
    card.append(&custom_row);
    card.append(&save);

    let columns = GtkBox::new(Orientation::Horizontal, tokens.spacing_24);
    card.set_hexpand(true);
    columns.append(&card);
    columns.append(&preview);
    page.append(&columns);
    page
}

fn build_preview(tokens: StyleTokens, selected: &Rc<Cell<ColorTriple>>) -> GtkBox {
    let preview = GtkBox::new(Orientation::Vertical, tokens.spacing_8);
    preview.add_css_class("portal-card");
    let title = Label::new(Some("Preview"));
    title.add_css_class("card-title");
    title.set_xalign(0.0);
    preview.append(&title);

    let solid = {
        let selected = selected.clone();
        color_swatch(tokens.swatch_width * 3, tokens.control_size, move || {
            selected.get().with_alpha(1.0)
        })
    };
    let subtle = {
        let selected = selected.clone();
        color_swatch(tokens.swatch_width * 3, tokens.control_size, move || {
            subtle_background(&selected.get())
        })
    };
    preview.append(&Label::new(Some("Primary Button")));
    preview.append(&solid);
    preview.append(&Label::new(Some("Subtle Brand Background")));
    preview.append(&subtle);
    preview
}
