use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::load_app_config;
use crate::context::{Portal, PortalHandle};
use crate::error::{AppError, AppResult};
use crate::layout::{LayoutState, NavPresentation, NAV_ITEMS};
use crate::storage::FileKeyValueStore;
use crate::ui::{StyleTokens, LAYOUT_TOKENS};
use gtk4::prelude::*;
use gtk4::{
    Align, Application, ApplicationWindow, Box as GtkBox, Button, DrawingArea, GestureClick,
    Label, Orientation, Overlay, PolicyType, ScrolledWindow, Stack, StackTransitionType,
};

mod chart;
mod layout;
mod runtime_css;
mod settings;
mod sidebar;
mod toast;

use self::chart::build_usage_chart;
use self::layout::WindowViewport;
use self::runtime_css::{install_runtime_css, GtkStyleScope};
use self::settings::build_branding_form;
use self::sidebar::{build_sidebar, SidebarView};
use self::toast::ToastRuntime;

const APPLICATION_ID: &str = "io.github.apiportal.ApiPortal";
const WINDOW_TITLE: &str = "API Portal";
const DASHBOARD_PATH: &str = "/";
const SETTINGS_PATH: &str = "/settings";

/// Headline figures shown on the dashboard until a metrics source is attached.
const DASHBOARD_METRICS: [(&str, &str, &str); 4] = [
    ("Total API Calls", "98.5K", "+12.3% from last week"),
    ("Active Users", "1,204", "+4.1% from last week"),
    ("Error Rate", "0.42%", "-0.08% from last week"),
    ("Avg Response Time", "182 ms", "-9 ms from last week"),
];

type SharedPortal = Rc<RefCell<Option<Portal>>>;

/// Widgets that follow the layout state outside of the sidebar itself.
struct ShellView {
    push_slot: GtkBox,
    overlay_slot: GtkBox,
    scrim: GtkBox,
    menu_button: Button,
    sidebar: Rc<SidebarView>,
    /// Spans the whole window; its `resize` follows every allocation change.
    resize_sentinel: DrawingArea,
}

impl ShellView {
    fn render_layout(&self, state: LayoutState) {
        let presentation = state.presentation();
        self.place_sidebar(presentation);
        self.sidebar.render_layout(presentation);
        self.push_slot
            .set_size_request(presentation.content_inset(), -1);
        self.scrim.set_visible(presentation.has_scrim());

        match presentation.menu_button_label() {
            Some(label) => {
                self.menu_button.set_label(label);
                self.menu_button.set_visible(true);
            }
            None => self.menu_button.set_visible(false),
        }
    }

    /// Overlay mode floats the panel above the content; every other mode
    /// pushes the content aside.
    fn place_sidebar(&self, presentation: NavPresentation) {
        let root = &self.sidebar.root;
        let target = if presentation == NavPresentation::Overlay {
            &self.overlay_slot
        } else {
            &self.push_slot
        };
        if root.parent().as_ref() == Some(target.upcast_ref::<gtk4::Widget>()) {
            return;
        }
        for slot in [&self.push_slot, &self.overlay_slot] {
            if root.parent().as_ref() == Some(slot.upcast_ref::<gtk4::Widget>()) {
                slot.remove(root);
            }
        }
        target.append(root);
        self.overlay_slot
            .set_visible(presentation == NavPresentation::Overlay);
    }
}

fn page_header(title: &str, description: &str) -> GtkBox {
    let header = GtkBox::new(Orientation::Vertical, LAYOUT_TOKENS.spacing_4);
    let heading = Label::new(Some(title));
    heading.add_css_class("page-title");
    heading.set_xalign(0.0);
    let subtitle = Label::new(Some(description));
    subtitle.add_css_class("dim-label");
    subtitle.set_xalign(0.0);
    subtitle.set_wrap(true);
    header.append(&heading);
    header.append(&subtitle);
    header
}

fn metric_card(tokens: StyleTokens, title: &str, value: &str, trend: &str) -> GtkBox {
    let card = GtkBox::new(Orientation::Vertical, tokens.spacing_4);
    card.add_css_class("portal-card");
    card.set_hexpand(true);
    let caption = Label::new(Some(title));
    caption.add_css_class("dim-label");
    caption.set_xalign(0.0);
    let figure = Label::new(Some(value));
    figure.add_css_class("card-title");
    figure.set_xalign(0.0);
    let detail = Label::new(Some(trend));
    detail.add_css_class("brand-text");
    detail.set_xalign(0.0);
    card.append(&caption);
    card.append(&figure);
    card.append(&detail);
    card
}

fn build_dashboard(handle: &PortalHandle, tokens: StyleTokens) -> GtkBox {
    let page = GtkBox::new(Orientation::Vertical, tokens.spacing_16);
    page.append(&page_header(
        "API Developer Portal",
        "Monitor your APIs performance and usage",
    ));

    let metrics = gtk4::FlowBox::new();
    metrics.set_selection_mode(gtk4::SelectionMode::None);
    metrics.set_homogeneous(true);
    metrics.set_max_children_per_line(DASHBOARD_METRICS.len() as u32);
    metrics.set_column_spacing(tokens.spacing_16 as u32);
    metrics.set_row_spacing(tokens.spacing_16 as u32);
    for (title, value, trend) in DASHBOARD_METRICS {
        metrics.insert(&metric_card(tokens, title, value, trend), -1);
    }
    page.append(&metrics);
    page.append(&build_usage_chart(handle, tokens));
    page
}

fn build_section_placeholder(title: &str) -> GtkBox {
    let page = GtkBox::new(Orientation::Vertical, LAYOUT_TOKENS.spacing_16);
    page.append(&page_header(
        title,
        "This section has no data source connected yet.",
    ));
    page
}

fn build_pages(handle: &PortalHandle, tokens: StyleTokens, toast: &ToastRuntime) -> Stack {
    let stack = Stack::new();
    stack.set_transition_type(StackTransitionType::Crossfade);
    stack.set_transition_duration(tokens.motion_standard_ms);
    for item in NAV_ITEMS {
        let page = match item.path {
            DASHBOARD_PATH => build_dashboard(handle, tokens),
            SETTINGS_PATH => build_branding_form(handle, tokens, toast),
            _ => build_section_placeholder(item.label),
        };
        page.set_margin_top(tokens.spacing_24);
        page.set_margin_bottom(tokens.spacing_24);
        page.set_margin_start(tokens.spacing_24);
        page.set_margin_end(tokens.spacing_24);
        stack.add_titled(&page, Some(item.path), item.label);
    }
    stack
}

fn build_shell(
    window: &ApplicationWindow,
    handle: &PortalHandle,
    tokens: StyleTokens,
) -> Rc<ShellView> {
    let overlay = Overlay::new();
    let row = GtkBox::new(Orientation::Horizontal, 0);
    let push_slot = GtkBox::new(Orientation::Vertical, 0);
    push_slot.set_vexpand(true);

    let toast_label = Label::new(None);
    toast_label.set_halign(Align::End);
    toast_label.set_valign(Align::Start);
    toast_label.set_margin_top(tokens.spacing_16);
    toast_label.set_margin_end(tokens.spacing_16);
    let toast = ToastRuntime::new(&toast_label, tokens.toast_duration_ms);

    let stack = build_pages(handle, tokens, &toast);
    let scroller = ScrolledWindow::new();
    scroller.set_policy(PolicyType::Never, PolicyType::Automatic);
    scroller.set_hexpand(true);
    scroller.set_vexpand(true);
    scroller.set_child(Some(&stack));
    row.append(&push_slot);
    row.append(&scroller);
    overlay.set_child(Some(&row));

    let resize_sentinel = DrawingArea::new();
    resize_sentinel.set_can_target(false);
    resize_sentinel.set_can_focus(false);
    overlay.add_overlay(&resize_sentinel);

    let scrim = GtkBox::new(Orientation::Vertical, 0);
    scrim.add_css_class("nav-scrim");
    scrim.set_hexpand(true);
    scrim.set_vexpand(true);
    {
        let handle = handle.clone();
        let click = GestureClick::new();
        click.connect_released(move |_, _, _, _| {
            handle.set_panel_expanded(false);
        });
        scrim.add_controller(click);
    }
    overlay.add_overlay(&scrim);

    let overlay_slot = GtkBox::new(Orientation::Vertical, 0);
    overlay_slot.set_halign(Align::Start);
    overlay_slot.set_vexpand(true);
    overlay_slot.set_visible(false);
    overlay.add_overlay(&overlay_slot);

    let menu_button = Button::with_label("Menu");
    menu_button.add_css_class("primary-action");
    menu_button.set_halign(Align::End);
    menu_button.set_valign(Align::End);
    menu_button.set_margin_end(tokens.spacing_16);
    menu_button.set_margin_bottom(tokens.spacing_16);
    {
        let handle = handle.clone();
        menu_button.connect_clicked(move |_| {
            handle.toggle_panel();
        });
    }
    overlay.add_overlay(&menu_button);
    overlay.add_overlay(&toast_label);

    let on_navigate: Rc<dyn Fn(&'static str)> = {
        let stack = stack.clone();
        let handle = handle.clone();
        Rc::new(move |path| {
            stack.set_visible_child_name(path);
            if handle.layout().presentation() == NavPresentation::Overlay {
                handle.set_panel_expanded(false);
            }
        })
    };
    let sidebar = build_sidebar(handle, tokens, on_navigate);
    {
        let sidebar = sidebar.clone();
        stack.connect_visible_child_name_notify(move |stack| {
            if let Some(path) = stack.visible_child_name() {
                tracing::debug!(path = %path, "navigated");
                sidebar.set_active(path.as_str());
            }
        });
    }
    sidebar.set_active(DASHBOARD_PATH);

    window.set_child(Some(&overlay));
    Rc::new(ShellView {
        push_slot,
        overlay_slot,
        scrim,
        menu_button,
        sidebar,
        resize_sentinel,
    })
}

fn activate_portal(
    app: &Application,
    storage: FileKeyValueStore,
    window_size: (i32, i32),
    portal_slot: &SharedPortal,
) -> AppResult<ApplicationWindow> {
    let tokens = LAYOUT_TOKENS;
    let motion_enabled = gtk4::Settings::default()
        .map(|settings| settings.is_gtk_enable_animations())
        .unwrap_or(true);
    install_runtime_css(tokens, motion_enabled);

    let (width, height) = window_size;
    let window = ApplicationWindow::builder()
        .application(app)
        .title(WINDOW_TITLE)
        .default_width(width)
        .default_height(height)
        .build();
    window.add_css_class("portal-root");

    let mut portal = Portal::mount(
        Box::new(storage),
        Box::new(GtkStyleScope::install()),
        &WindowViewport::new(&window, width),
    )?;
    let handle = portal.handle();

    let shell = build_shell(&window, &handle, tokens);
    let snapshot = handle.snapshot();
    shell.sidebar.render_branding(&snapshot.branding);
    shell.render_layout(snapshot.layout);
    {
        let shell = shell.clone();
        handle.connect_layout_changed(move |state| shell.render_layout(state));
    }
    {
        let shell = shell.clone();
        handle.connect_branding_changed(move |profile| shell.sidebar.render_branding(profile));
    }

    connect_viewport_signals(&mut portal, &window, &shell.resize_sentinel, width);

    {
        let portal_slot = portal_slot.clone();
        window.connect_close_request(move |_| {
            if let Some(portal) = portal_slot.borrow_mut().take() {
                portal.unmount();
            }
            gtk4::glib::Propagation::Proceed
        });
    }

    portal_slot.borrow_mut().replace(portal);
    Ok(window)
}

/// Reclassifies the viewport after any window size change. Maximize,
/// fullscreen and tiling leave `default-width` untouched, so the sentinel's
/// allocation is the signal that always fires.
fn connect_viewport_signals(
    portal: &mut Portal,
    window: &ApplicationWindow,
    resize_sentinel: &DrawingArea,
    fallback_width: i32,
) {
    let schedule_recompute: Rc<dyn Fn()> = {
        let handle = portal.handle();
        let window = window.downgrade();
        Rc::new(move || {
            let handle = handle.clone();
            let window = window.clone();
            // run after the allocation pass; the listeners rebuild widgets
            gtk4::glib::idle_add_local_once(move || {
                if let Some(window) = window.upgrade() {
                    handle.recompute_viewport_class(&WindowViewport::new(&window, fallback_width));
                }
            });
        })
    };

    let window_handlers = vec![
        window.connect_default_width_notify({
            let schedule_recompute = schedule_recompute.clone();
            move |_| schedule_recompute()
        }),
        window.connect_maximized_notify({
            let schedule_recompute = schedule_recompute.clone();
            move |_| schedule_recompute()
        }),
        window.connect_fullscreened_notify({
            let schedule_recompute = schedule_recompute.clone();
            move |_| schedule_recompute()
        }),
    ];
    let sentinel_handler =
        resize_sentinel.connect_resize(move |_, _, _| schedule_recompute());

    let window = window.clone();
    let resize_sentinel = resize_sentinel.clone();
    portal.on_unmount(move || {
        for handler in window_handlers {
            window.disconnect(handler);
        }
        resize_sentinel.disconnect(sentinel_handler);
    });
}

/// GTK only sees argv[0]; the portal takes no command-line flags.
fn gtk_launch_args() -> Vec<String> {
    std::env::args().take(1).collect()
}

pub struct App {
    startup_error: Rc<RefCell<Option<AppError>>>,
}

impl App {
    pub fn new() -> Self {
        Self {
            startup_error: Rc::new(RefCell::new(None)),
        }
    }

    pub fn start(&mut self) -> AppResult<()> {
        let config = load_app_config();
        let storage = FileKeyValueStore::with_dir(config.storage_dir()?);
        let window_size = config.window_size();
        tracing::info!(storage_dir = %storage.dir().display(), "using branding storage");

        tracing::info!("starting gtk runtime");
        let application = Application::new(
            Some(APPLICATION_ID),
            gtk4::gio::ApplicationFlags::NON_UNIQUE,
        );

        let portal_slot: SharedPortal = Rc::new(RefCell::new(None));
        let activate_once = Rc::new(Cell::new(false));
        {
            let portal_slot = portal_slot.clone();
            let startup_error = self.startup_error.clone();
            application.connect_activate(move |app| {
                if activate_once.replace(true) {
                    tracing::debug!("ignoring duplicate gtk activate signal");
                    return;
                }
                match activate_portal(app, storage.clone(), window_size, &portal_slot) {
                    Ok(window) => {
                        tracing::info!("presenting portal window");
                        window.present();
                    }
                    Err(err) => {
                        tracing::error!(?err, "failed to mount portal");
                        startup_error.borrow_mut().replace(err);
                        app.quit();
                    }
                }
            });
        }

        application.run_with_args(&gtk_launch_args());

        if let Some(portal) = portal_slot.borrow_mut().take() {
            portal.unmount();
        }
        match self.startup_error.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_nav_item_has_a_page_route() {
        assert!(NAV_ITEMS.iter().any(|item| item.path == DASHBOARD_PATH));
        assert!(NAV_ITEMS.iter().any(|item| item.path == SETTINGS_PATH));
    }

    #[test]
    fn gtk_launch_args_keeps_only_program_name() {
        assert!(gtk_launch_args().len() <= 1);
    }
}
