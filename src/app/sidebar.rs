use std::rc::Rc;

use crate::branding::BrandingProfile;
use crate::context::PortalHandle;
use crate::layout::{NavItem, NavPresentation, NAV_ITEMS};
use crate::ui::{icon_button, labeled_icon_button, StyleTokens};
use gtk4::prelude::*;
use gtk4::{gio, Align, Box as GtkBox, Button, Label, Orientation, Picture};

const COLLAPSE_ICON: &str = "go-previous-symbolic";
const EXPAND_ICON: &str = "go-next-symbolic";

pub(super) struct SidebarView {
    pub(super) root: GtkBox,
    monogram: Label,
    logo: Picture,
    title: Label,
    header_toggle: Button,
    nav_entries: Vec<(NavItem, Button, Label)>,
}

impl SidebarView {
    pub(super) fn render_branding(&self, profile: &BrandingProfile) {
        if profile.has_custom_logo() {
            let file = gio::File::for_commandline_arg(profile.logo_url.trim());
            self.logo.set_file(Some(&file));
            self.logo
                .set_alternative_text(Some(&format!("{} Logo", profile.display_name)));
            self.logo.set_visible(true);
            self.monogram.set_visible(false);
        } else {
            let monogram = profile.monogram().map(String::from).unwrap_or_default();
            self.monogram.set_text(&monogram);
            self.monogram.set_visible(true);
            self.logo.set_visible(false);
        }
        self.title.set_text(&profile.display_name);
    }

    pub(super) fn render_layout(&self, presentation: NavPresentation) {
        self.root.set_visible(presentation != NavPresentation::Hidden);
        self.root.set_size_request(presentation.panel_width(), -1);
        if presentation == NavPresentation::Overlay {
            self.root.add_css_class("overlay");
        } else {
            self.root.remove_css_class("overlay");
        }

        let labels = presentation.shows_labels();
        self.title.set_visible(labels);
        for (_, button, label) in &self.nav_entries {
            label.set_visible(labels);
            button.set_halign(if labels { Align::Fill } else { Align::Center });
        }

        self.header_toggle
            .set_visible(presentation.shows_header_toggle());
        self.header_toggle.set_icon_name(if labels {
            COLLAPSE_ICON
        } else {
            EXPAND_ICON
        });
    }

    pub(super) fn set_active(&self, path: &str) {
        for (item, button, _) in &self.nav_entries {
            if item.path == path {
                button.add_css_class("active");
            } else {
                button.remove_css_class("active");
            }
        }
    }
}

pub(super) fn build_sidebar(
    handle: &PortalHandle,
    tokens: StyleTokens,
    on_navigate: Rc<dyn Fn(&'static str)>,
) -> Rc<SidebarView> {
    let root = GtkBox::new(Orientation::Vertical, 0);
    root.add_css_class("portal-sidebar");
    root.set_vexpand(true);

    let header = GtkBox::new(Orientation::Horizontal, tokens.spacing_8);
    header.add_css_class("sidebar-header");
    let monogram = Label::new(None);
    monogram.add_css_class("brand-monogram");
    monogram.set_size_request(tokens.monogram_size, tokens.monogram_size);
    let logo = Picture::new();
    logo.set_can_shrink(true);
    logo.set_size_request(tokens.monogram_size, tokens.monogram_size);
    let title = Label::new(None);
    title.add_css_class("sidebar-title");
    title.set_hexpand(true);
    title.set_xalign(0.0);
    title.set_ellipsize(gtk4::pango::EllipsizeMode::End);
    let header_toggle = icon_button(
        COLLAPSE_ICON,
        "Toggle navigation",
        tokens.control_size,
        &["sidebar-toggle"],
    );
    {
        let handle = handle.clone();
        header_toggle.connect_clicked(move |_| {
            handle.toggle_panel();
        });
    }
    header.append(&monogram);
    header.append(&logo);
    header.append(&title);
    header.append(&header_toggle);

    let nav = GtkBox::new(Orientation::Vertical, tokens.spacing_4);
    nav.set_margin_top(tokens.spacing_16);
    nav.set_margin_start(tokens.spacing_8);
    nav.set_margin_end(tokens.spacing_8);
    let mut nav_entries = Vec::with_capacity(NAV_ITEMS.len());
    for item in NAV_ITEMS {
        let (button, label) = labeled_icon_button(
            item.icon_name,
            item.label,
            tokens.icon_size,
            tokens.spacing_12,
            &["nav-item"],
        );
        {
            let on_navigate = on_navigate.clone();
            button.connect_clicked(move |_| on_navigate(item.path));
        }
        nav.append(&button);
        nav_entries.push((item, button, label));
    }

    root.append(&header);
    root.append(&nav);

    Rc::new(SidebarView {
        root,
        monogram,
        logo,
        title,
        header_toggle,
        nav_entries,
    })
}
