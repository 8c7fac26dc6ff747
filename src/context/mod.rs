use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::branding::{BrandingChange, BrandingPatch, BrandingProfile, BrandingStore};
use crate::error::{AppError, AppResult};
use crate::layout::{LayoutManager, LayoutState, Viewport};
use crate::storage::KeyValueStore;
use crate::theme::{StyleScope, StyleVars};

thread_local! {
    static PORTAL_MOUNTED: Cell<bool> = const { Cell::new(false) };
}

type BrandingListener = Rc<dyn Fn(&BrandingProfile)>;
type LayoutListener = Rc<dyn Fn(LayoutState)>;
type Teardown = Box<dyn FnOnce()>;

#[derive(Debug, Clone, PartialEq)]
pub struct PortalSnapshot {
    pub branding: BrandingProfile,
    pub layout: LayoutState,
}

struct PortalState {
    branding: BrandingStore,
    layout: LayoutManager,
    style_scope: Box<dyn StyleScope>,
}

struct PortalInner {
    state: RefCell<PortalState>,
    branding_listeners: RefCell<Vec<BrandingListener>>,
    layout_listeners: RefCell<Vec<LayoutListener>>,
}

/// Shared read/write access to branding and layout. Cheap to clone; hand
/// one to every widget that needs it.
#[derive(Clone)]
pub struct PortalHandle {
    inner: Rc<PortalInner>,
}

impl PortalHandle {
    pub fn branding(&self) -> BrandingProfile {
        self.inner.state.borrow().branding.profile().clone()
    }

    pub fn layout(&self) -> LayoutState {
        self.inner.state.borrow().layout.state()
    }

    pub fn snapshot(&self) -> PortalSnapshot {
        let state = self.inner.state.borrow();
        PortalSnapshot {
            branding: state.branding.profile().clone(),
            layout: state.layout.state(),
        }
    }

    pub fn style_vars(&self) -> StyleVars {
        StyleVars::derive(&self.inner.state.borrow().branding.profile().primary_color)
    }

    /// Merges `patch` into the profile, persists it, and re-projects the
    /// style variables when the primary color changed.
    pub fn update_branding(&self, patch: &BrandingPatch) -> BrandingChange {
        let (change, profile) = {
            let mut state = self.inner.state.borrow_mut();
            let change = state.branding.update(patch);
            let profile = state.branding.profile().clone();
            if change.primary_color_changed {
                project_style_vars(state.style_scope.as_mut(), &profile);
            }
            (change, profile)
        };

        let listeners = self.inner.branding_listeners.borrow().clone();
        for listener in listeners {
            listener(&profile);
        }
        change
    }

    pub fn set_panel_expanded(&self, value: bool) -> LayoutState {
        self.mutate_layout(|layout| layout.set_panel_expanded(value))
    }

    pub fn toggle_panel(&self) -> LayoutState {
        self.mutate_layout(LayoutManager::toggle_panel)
    }

    pub fn recompute_viewport_class(&self, viewport: &dyn Viewport) -> LayoutState {
        self.mutate_layout(|layout| layout.recompute_viewport_class(viewport))
    }

    pub fn connect_branding_changed(&self, listener: impl Fn(&BrandingProfile) + 'static) {
        self.inner
            .branding_listeners
            .borrow_mut()
            .push(Rc::new(listener));
    }

    pub fn connect_layout_changed(&self, listener: impl Fn(LayoutState) + 'static) {
        self.inner
            .layout_listeners
            .borrow_mut()
            .push(Rc::new(listener));
    }

    fn mutate_layout(&self, apply: impl FnOnce(&mut LayoutManager) -> LayoutState) -> LayoutState {
        let (before, after) = {
            let mut state = self.inner.state.borrow_mut();
            let before = state.layout.state();
            (before, apply(&mut state.layout))
        };

        if before != after {
            let listeners = self.inner.layout_listeners.borrow().clone();
            for listener in listeners {
                listener(after);
            }
        }
        after
    }

    fn clear_listeners(&self) {
        self.inner.branding_listeners.borrow_mut().clear();
        self.inner.layout_listeners.borrow_mut().clear();
    }
}

/// Owner of the process-wide portal state. At most one is mounted per UI
/// thread; dropping it runs the registered teardowns and releases the slot.
pub struct Portal {
    handle: PortalHandle,
    teardowns: Vec<Teardown>,
}

impl Portal {
    pub fn mount(
        storage: Box<dyn KeyValueStore>,
        mut style_scope: Box<dyn StyleScope>,
        viewport: &dyn Viewport,
    ) -> AppResult<Self> {
        if PORTAL_MOUNTED.with(|mounted| mounted.replace(true)) {
            return Err(AppError::AlreadyMounted);
        }

        let mut branding = BrandingStore::new(storage);
        let profile = branding.load().clone();
        project_style_vars(style_scope.as_mut(), &profile);
        let layout = LayoutManager::mount(viewport);
        tracing::info!(
            name = %profile.display_name,
            layout = %layout,
            "mounted portal state"
        );

        Ok(Self {
            handle: PortalHandle {
                inner: Rc::new(PortalInner {
                    state: RefCell::new(PortalState {
                        branding,
                        layout,
                        style_scope,
                    }),
                    branding_listeners: RefCell::new(Vec::new()),
                    layout_listeners: RefCell::new(Vec::new()),
                }),
            },
            teardowns: Vec::new(),
        })
    }

    pub fn handle(&self) -> PortalHandle {
        self.handle.clone()
    }

    /// Registers cleanup to run at unmount, e.g. disconnecting a resize
    /// signal handler.
    pub fn on_unmount(&mut self, teardown: impl FnOnce() + 'static) {
        self.teardowns.push(Box::new(teardown));
    }

    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for Portal {
    fn drop(&mut self) {
        for teardown in self.teardowns.drain(..).rev() {
            teardown();
        }
        self.handle.clear_listeners();
        PORTAL_MOUNTED.with(|mounted| mounted.set(false));
        tracing::info!("unmounted portal state");
    }
}

fn project_style_vars(scope: &mut dyn StyleScope, profile: &BrandingProfile) {
    let vars = StyleVars::derive(&profile.primary_color);
    tracing::debug!(primary_color = %profile.primary_color, "projecting style variables");
    scope.apply(&vars);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branding::BRANDING_STORAGE_KEY;
    use crate::color::{ColorTriple, BRAND_PRESETS, DEFAULT_BRAND_COLOR};
    use crate::layout::{FixedViewport, NavPresentation};
    use crate::storage::MemoryKeyValueStore;
    use crate::theme::{MemoryStyleScope, StyleVar};

    fn mount_with(
        storage: &MemoryKeyValueStore,
        scope: &MemoryStyleScope,
        width: i32,
    ) -> Portal {
        Portal::mount(
            Box::new(storage.clone()),
            Box::new(scope.clone()),
            &FixedViewport(width),
        )
        .expect("portal should mount")
    }

    #[test]
    fn mount_projects_default_branding_and_classifies_viewport() {
        let storage = MemoryKeyValueStore::new();
        let scope = MemoryStyleScope::new();
        let portal = mount_with(&storage, &scope, 500);
        let handle = portal.handle();

        assert_eq!(handle.branding(), BrandingProfile::default());
        assert_eq!(scope.projection_count(), 1);
        assert_eq!(scope.current(), Some(StyleVars::derive(&DEFAULT_BRAND_COLOR)));
        assert!(handle.layout().is_compact_viewport);
        assert!(!handle.layout().panel_expanded);
    }

    #[test]
    fn mount_restores_stored_profile() {
        let storage = MemoryKeyValueStore::new();
        storage
            .set(
                BRANDING_STORAGE_KEY,
                r#"{"name":"Acme","logo":"","primaryColor":"0 84% 60%"}"#,
            )
            .unwrap();
        let scope = MemoryStyleScope::new();
        let portal = mount_with(&storage, &scope, 1280);

        assert_eq!(portal.handle().branding().display_name, "Acme");
        let projected = scope.current().unwrap();
        assert_eq!(
            projected.get(StyleVar::Primary).to_string(),
            "hsla(0, 84%, 60%, 1)"
        );
    }

    #[test]
    fn name_only_update_does_not_reproject() {
        let scope = MemoryStyleScope::new();
        let portal = mount_with(&MemoryKeyValueStore::new(), &scope, 1280);
        let handle = portal.handle();

        let change = handle.update_branding(&BrandingPatch::new().display_name("Acme"));
        assert!(!change.primary_color_changed);
        assert_eq!(scope.projection_count(), 1);
        assert_eq!(handle.branding().display_name, "Acme");
    }

    #[test]
    fn color_update_reprojects_all_variables() {
        let scope = MemoryStyleScope::new();
        let portal = mount_with(&MemoryKeyValueStore::new(), &scope, 1280);
        let red: ColorTriple = "0 84% 60%".parse().unwrap();

        portal
            .handle()
            .update_branding(&BrandingPatch::new().primary_color(red));

        assert_eq!(scope.projection_count(), 2);
        let projected = scope.current().unwrap();
        for (var, color) in projected.iter() {
            assert_eq!(
                (color.hue, color.saturation, color.lightness),
                (0.0, 84.0, 60.0),
                "{} was not re-projected",
                var.name()
            );
        }
    }

    #[test]
    fn repeated_color_update_is_idempotent() {
        let storage = MemoryKeyValueStore::new();
        let scope = MemoryStyleScope::new();
        let portal = mount_with(&storage, &scope, 1280);
        let handle = portal.handle();
        let patch = BrandingPatch::new().primary_color(BRAND_PRESETS[2].color);

        handle.update_branding(&patch);
        let stored_once = storage.get(BRANDING_STORAGE_KEY).unwrap();
        let projected_once = scope.current();
        handle.update_branding(&patch);

        assert_eq!(storage.get(BRANDING_STORAGE_KEY).unwrap(), stored_once);
        assert_eq!(scope.current(), projected_once);
    }

    #[test]
    fn resize_to_compact_collapses_and_notifies() {
        let portal = mount_with(&MemoryKeyValueStore::new(), &MemoryStyleScope::new(), 1280);
        let handle = portal.handle();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        handle.connect_layout_changed(move |state| sink.borrow_mut().push(state.presentation()));

        assert!(handle.layout().panel_expanded);
        let state = handle.recompute_viewport_class(&FixedViewport(400));

        assert!(state.is_compact_viewport);
        assert!(!state.panel_expanded);
        assert_eq!(*seen.borrow(), [NavPresentation::Hidden]);
    }

    #[test]
    fn layout_listeners_skip_unchanged_states() {
        let portal = mount_with(&MemoryKeyValueStore::new(), &MemoryStyleScope::new(), 1280);
        let handle = portal.handle();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        handle.connect_layout_changed(move |_| counter.set(counter.get() + 1));

        handle.recompute_viewport_class(&FixedViewport(1100));
        handle.set_panel_expanded(true);
        assert_eq!(calls.get(), 0);

        handle.toggle_panel();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn listeners_may_read_state_while_notified() {
        let portal = mount_with(&MemoryKeyValueStore::new(), &MemoryStyleScope::new(), 1280);
        let handle = portal.handle();
        let reader = handle.clone();
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        handle.connect_branding_changed(move |profile| {
            assert_eq!(reader.branding(), *profile);
            sink.replace(Some(profile.display_name.clone()));
        });

        handle.update_branding(&BrandingPatch::new().display_name("Acme"));
        assert_eq!(seen.borrow().as_deref(), Some("Acme"));
    }

    #[test]
    fn second_mount_is_rejected_until_unmount() {
        let storage = MemoryKeyValueStore::new();
        let scope = MemoryStyleScope::new();
        let portal = mount_with(&storage, &scope, 1280);

        let second = Portal::mount(
            Box::new(storage.clone()),
            Box::new(scope.clone()),
            &FixedViewport(1280),
        );
        assert!(matches!(second, Err(AppError::AlreadyMounted)));

        portal.unmount();
        assert!(Portal::mount(Box::new(storage), Box::new(scope), &FixedViewport(1280)).is_ok());
    }

    #[test]
    fn unmount_runs_teardowns_and_drops_listeners() {
        let torn_down = Rc::new(Cell::new(false));
        let flag = torn_down.clone();
        let mut portal =
            mount_with(&MemoryKeyValueStore::new(), &MemoryStyleScope::new(), 1280);
        let handle = portal.handle();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        handle.connect_layout_changed(move |_| counter.set(counter.get() + 1));
        portal.on_unmount(move || flag.set(true));

        portal.unmount();
        handle.toggle_panel();

        assert!(torn_down.get());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn reload_after_update_round_trips_profile() {
        let storage = MemoryKeyValueStore::new();
        let expected = BrandingProfile {
            display_name: "Acme".to_string(),
            logo_url: "https://acme.test/logo.png".to_string(),
            primary_color: BRAND_PRESETS[4].color,
        };
        {
            let portal = mount_with(&storage, &MemoryStyleScope::new(), 1280);
            portal.handle().update_branding(
                &BrandingPatch::new()
                    .display_name(expected.display_name.clone())
                    .logo_url(expected.logo_url.clone())
                    .primary_color(expected.primary_color),
            );
        }

        let portal = mount_with(&storage, &MemoryStyleScope::new(), 1280);
        assert_eq!(portal.handle().branding(), expected);
    }

    #[test]
    fn snapshot_reflects_branding_and_layout_after_updates() {
        let portal = mount_with(&MemoryKeyValueStore::new(), &MemoryStyleScope::new(), 1280);
        let handle = portal.handle();
        handle.update_branding(&BrandingPatch::new().display_name("Acme"));
        handle.toggle_panel();

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.branding, handle.branding());
        assert_eq!(snapshot.branding.display_name, "Acme");
        assert_eq!(snapshot.layout.presentation(), NavPresentation::Rail);
    }

    #[test]
    fn style_vars_match_latest_projection() {
        let scope = MemoryStyleScope::new();
        let portal = mount_with(&MemoryKeyValueStore::new(), &scope, 1280);
        let handle = portal.handle();
        assert_eq!(Some(handle.style_vars()), scope.current());

        handle.update_branding(&BrandingPatch::new().primary_color(BRAND_PRESETS[6].color));
        assert_eq!(Some(handle.style_vars()), scope.current());
        assert_eq!(
            handle.style_vars(),
            StyleVars::derive(&BRAND_PRESETS[6].color)
        );
    }
}
