use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{ColorTriple, DEFAULT_BRAND_COLOR};
use crate::storage::{KeyValueStore, StorageError};

pub const BRANDING_STORAGE_KEY: &str = "portal-branding";
pub const DEFAULT_DISPLAY_NAME: &str = "API Portal";

pub type BrandingResult<T> = std::result::Result<T, BrandingError>;

#[derive(Debug, Error)]
pub enum BrandingError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to encode branding profile")]
    Encode(#[from] serde_json::Error),
}

/// Display name, logo reference and primary color of the portal.
///
/// Serialized with the `name`/`logo`/`primaryColor` keys; an empty `logo`
/// means the monogram is rendered instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandingProfile {
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "logo")]
    pub logo_url: String,
    #[serde(rename = "primaryColor")]
    pub primary_color: ColorTriple,
}

impl Default for BrandingProfile {
    fn default() -> Self {
        Self {
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            logo_url: String::new(),
            primary_color: DEFAULT_BRAND_COLOR,
        }
    }
}

impl BrandingProfile {
    pub fn has_custom_logo(&self) -> bool {
        !self.logo_url.trim().is_empty()
    }

    pub fn monogram(&self) -> Option<char> {
        self.display_name.trim().chars().next()
    }

    fn merged_with(&self, patch: &BrandingPatch) -> BrandingProfile {
        BrandingProfile {
            display_name: patch
                .display_name
                .clone()
                .unwrap_or_else(|| self.display_name.clone()),
            logo_url: patch
                .logo_url
                .clone()
                .unwrap_or_else(|| self.logo_url.clone()),
            primary_color: patch.primary_color.unwrap_or(self.primary_color),
        }
    }
}

/// Partial profile: `None` keeps the current value, `Some` replaces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrandingPatch {
    pub display_name: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: Option<ColorTriple>,
}

impl BrandingPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_name(mut self, value: impl Into<String>) -> Self {
        self.display_name = Some(value.into());
        self
    }

    pub fn logo_url(mut self, value: impl Into<String>) -> Self {
        self.logo_url = Some(value.into());
        self
    }

    pub fn primary_color(mut self, value: ColorTriple) -> Self {
        self.primary_color = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.logo_url.is_none() && self.primary_color.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrandingChange {
    pub primary_color_changed: bool,
    /// `false` when the durable write failed; the in-memory profile is
    /// updated either way.
    pub persisted: bool,
}

pub struct BrandingStore {
    profile: BrandingProfile,
    storage: Box<dyn KeyValueStore>,
    loaded: bool,
}

impl BrandingStore {
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self {
            profile: BrandingProfile::default(),
            storage,
            loaded: false,
        }
    }

    pub fn profile(&self) -> &BrandingProfile {
        &self.profile
    }

    /// Best-effort warm start from storage. Absent or unreadable entries
    /// keep the default profile; only the first call reads storage.
    pub fn load(&mut self) -> &BrandingProfile {
        if self.loaded {
            tracing::debug!("branding profile already loaded; skipping storage read");
            return &self.profile;
        }
        self.loaded = true;

        match self.storage.get(BRANDING_STORAGE_KEY) {
            Ok(Some(serialized)) => match serde_json::from_str::<BrandingProfile>(&serialized) {
                Ok(profile) => {
                    tracing::info!(
                        name = %profile.display_name,
                        primary_color = %profile.primary_color,
                        "restored branding profile"
                    );
                    self.profile = profile;
                }
                Err(err) => {
                    tracing::warn!(?err, "stored branding profile is malformed; using defaults");
                }
            },
            Ok(None) => {
                tracing::debug!("no stored branding profile; using defaults");
            }
            Err(err) => {
                tracing::warn!(?err, "failed to read stored branding profile; using defaults");
            }
        }

        &self.profile
    }

    pub fn update(&mut self, patch: &BrandingPatch) -> BrandingChange {
        let next = self.profile.merged_with(patch);
        let primary_color_changed = next.primary_color != self.profile.primary_color;
        self.profile = next;

        let persisted = match self.persist() {
            Ok(()) => {
                tracing::debug!(primary_color_changed, "persisted branding profile");
                true
            }
            Err(err) => {
                tracing::error!(?err, "failed to persist branding profile");
                false
            }
        };

        BrandingChange {
            primary_color_changed,
            persisted,
        }
    }

    fn persist(&self) -> BrandingResult<()> {
        let serialized = serde_json::to_string(&self.profile)?;
        self.storage.set(BRANDING_STORAGE_KEY, &serialized)?;
        Ok(())
    }
}

impl std::fmt::Debug for BrandingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrandingStore")
            .field("profile", &self.profile)
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BRAND_PRESETS;
    use crate::storage::{MemoryKeyValueStore, StorageResult};

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::InvalidKey(key.to_string()))
        }

        fn set(&self, key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }

    fn acme() -> BrandingProfile {
        BrandingProfile {
            display_name: "Acme".to_string(),
            logo_url: "https://acme.test/logo.svg".to_string(),
            primary_color: BRAND_PRESETS[1].color,
        }
    }

    #[test]
    fn default_profile_uses_default_blue() {
        let store = BrandingStore::new(Box::new(MemoryKeyValueStore::new()));
        let profile = store.profile();
        assert_eq!(profile.display_name, "API Portal");
        assert!(profile.logo_url.is_empty());
        assert_eq!(profile.primary_color.to_string(), "221.2 83% 53.3%");
        assert_eq!(profile.monogram(), Some('A'));
        assert!(!profile.has_custom_logo());
    }

    #[test]
    fn load_without_stored_profile_keeps_default() {
        let mut store = BrandingStore::new(Box::new(MemoryKeyValueStore::new()));
        assert_eq!(store.load(), &BrandingProfile::default());
    }

    #[test]
    fn load_with_corrupted_entry_falls_back_silently() {
        let storage = MemoryKeyValueStore::new();
        storage.set(BRANDING_STORAGE_KEY, "{ not json").unwrap();
        let mut store = BrandingStore::new(Box::new(storage));
        assert_eq!(store.load(), &BrandingProfile::default());
    }

    #[test]
    fn load_with_malformed_color_falls_back_to_default() {
        let storage = MemoryKeyValueStore::new();
        storage
            .set(
                BRANDING_STORAGE_KEY,
                r#"{"name":"Acme","logo":"","primaryColor":"221 83%"}"#,
            )
            .unwrap();
        let mut store = BrandingStore::new(Box::new(storage));
        assert_eq!(store.load(), &BrandingProfile::default());
    }

    #[test]
    fn load_with_unreadable_storage_falls_back_to_default() {
        let mut store = BrandingStore::new(Box::new(FailingStore));
        assert_eq!(store.load(), &BrandingProfile::default());
    }

    #[test]
    fn update_then_load_round_trips_all_fields() {
        let storage = MemoryKeyValueStore::new();
        let mut first = BrandingStore::new(Box::new(storage.clone()));
        let expected = acme();
        let change = first.update(
            &BrandingPatch::new()
                .display_name(expected.display_name.clone())
                .logo_url(expected.logo_url.clone())
                .primary_color(expected.primary_color),
        );
        assert!(change.persisted);

        let mut second = BrandingStore::new(Box::new(storage));
        assert_eq!(second.load(), &expected);
    }

    #[test]
    fn stored_entry_uses_original_field_names() {
        let storage = MemoryKeyValueStore::new();
        let mut store = BrandingStore::new(Box::new(storage.clone()));
        store.update(&BrandingPatch::new().display_name("Acme"));

        let raw = storage.get(BRANDING_STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["name"], "Acme");
        assert_eq!(value["logo"], "");
        assert_eq!(value["primaryColor"], "221.2 83% 53.3%");
    }

    #[test]
    fn update_merges_only_present_fields() {
        let mut store = BrandingStore::new(Box::new(MemoryKeyValueStore::new()));
        store.update(&BrandingPatch::new().logo_url("/logo.png"));
        let change = store.update(&BrandingPatch::new().display_name("Acme"));

        assert!(!change.primary_color_changed);
        assert_eq!(store.profile().display_name, "Acme");
        assert_eq!(store.profile().logo_url, "/logo.png");
        assert_eq!(store.profile().primary_color, DEFAULT_BRAND_COLOR);
    }

    #[test]
    fn update_reports_primary_color_change_once() {
        let storage = MemoryKeyValueStore::new();
        let mut store = BrandingStore::new(Box::new(storage.clone()));
        let red = BRAND_PRESETS[3].color;
        let patch = BrandingPatch::new().primary_color(red);

        let first = store.update(&patch);
        let stored_after_first = storage.get(BRANDING_STORAGE_KEY).unwrap();
        let second = store.update(&patch);

        assert!(first.primary_color_changed);
        assert!(!second.primary_color_changed);
        assert_eq!(storage.get(BRANDING_STORAGE_KEY).unwrap(), stored_after_first);
        assert_eq!(store.profile().primary_color, red);
    }

    #[test]
    fn update_keeps_in_memory_profile_when_persisting_fails() {
        let mut store = BrandingStore::new(Box::new(FailingStore));
        let change = store.update(&BrandingPatch::new().display_name("Offline"));
        assert!(!change.persisted);
        assert_eq!(store.profile().display_name, "Offline");
    }

    #[test]
    fn second_load_does_not_reread_storage() {
        let storage = MemoryKeyValueStore::new();
        let mut store = BrandingStore::new(Box::new(storage.clone()));
        store.load();
        storage
            .set(
                BRANDING_STORAGE_KEY,
                &serde_json::to_string(&acme()).unwrap(),
            )
            .unwrap();
        assert_eq!(store.load(), &BrandingProfile::default());
    }

    #[test]
    fn monogram_skips_leading_whitespace_and_handles_empty_names() {
        let mut profile = BrandingProfile::default();
        profile.display_name = "  zeta".to_string();
        assert_eq!(profile.monogram(), Some('z'));
        profile.display_name = String::new();
        assert_eq!(profile.monogram(), None);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(BrandingPatch::new().is_empty());
        assert!(!BrandingPatch::new().logo_url("").is_empty());
    }
}
