//! 偏好设置存储
//!
//! 创建时从持久化存储加载（缺失或残缺时以默认值补全）并立即应用主题；
//! 此后每次修改都会整体重新序列化到 `app-settings`，并重新应用主题。

use cropvision_shared::STORAGE_KEY_SETTINGS;
use cropvision_shared::settings::{Settings, Theme};

use crate::error::{ClientError, ClientResult};
use crate::storage::KeyValueStore;

/// 主题副作用的承载者（浏览器中为 `<html>` 上的 `dark` class）
pub trait ThemeApplier {
    /// 当前系统是否偏好暗色
    fn prefers_dark(&self) -> bool;
    fn set_dark(&self, dark: bool);
}

#[derive(Clone)]
pub struct SettingsStore<S: KeyValueStore, T: ThemeApplier> {
    storage: S,
    theme: T,
    settings: Settings,
}

impl<S: KeyValueStore, T: ThemeApplier> SettingsStore<S, T> {
    pub fn load(storage: S, theme: T) -> Self {
        let settings = match storage.get(STORAGE_KEY_SETTINGS) {
            Some(raw) => {
                let (settings, patched) = Settings::from_json_lenient(&raw);
                if patched {
                    log_warn!("[Settings] Stored settings were incomplete, defaults applied.");
                }
                settings
            }
            None => Settings::default(),
        };

        let store = Self {
            storage,
            theme,
            settings,
        };
        // 补全后的对象立即写回，失败已在 commit 中记录
        let _ = store.commit();
        store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// 修改设置：规范化后持久化并应用主题
    ///
    /// 持久化失败时内存中的修改仍然生效，错误返回给调用方。
    pub fn change<F>(&mut self, f: F) -> ClientResult<()>
    where
        F: FnOnce(&mut Settings),
    {
        f(&mut self.settings);
        self.settings.normalize();
        self.commit()
    }

    pub fn set_theme(&mut self, theme: Theme) -> ClientResult<()> {
        self.change(|s| s.theme = theme)
    }

    /// 恢复默认设置
    pub fn reset(&mut self) -> ClientResult<()> {
        self.change(|s| *s = Settings::default())
    }

    /// 重新采样系统配色偏好并应用（供系统偏好变化监听使用）
    pub fn reapply_theme(&self) {
        self.apply_theme();
    }

    /// 当前是否处于暗色
    pub fn is_dark(&self) -> bool {
        self.settings.theme.is_dark(self.theme.prefers_dark())
    }

    fn commit(&self) -> ClientResult<()> {
        let result = self
            .settings
            .to_json()
            .map_err(ClientError::from)
            .and_then(|raw| self.storage.set(STORAGE_KEY_SETTINGS, &raw))
            .map_err(|e| e.in_op("settings.persist"));
        if let Err(e) = &result {
            log_error!("[Settings] {}", e);
        }
        self.apply_theme();
        result
    }

    fn apply_theme(&self) {
        let dark = self.settings.theme.is_dark(self.theme.prefers_dark());
        self.theme.set_dark(dark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientErrorStatus;
    use crate::storage::MemoryStore;
    use cropvision_shared::settings::{Language, ModelChoice};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// 记录每次主题应用结果的测试替身
    #[derive(Clone, Default)]
    struct RecordingTheme {
        system_dark: Rc<Cell<bool>>,
        applied: Rc<RefCell<Vec<bool>>>,
    }

    impl RecordingTheme {
        fn last(&self) -> Option<bool> {
            self.applied.borrow().last().copied()
        }
    }

    impl ThemeApplier for RecordingTheme {
        fn prefers_dark(&self) -> bool {
            self.system_dark.get()
        }

        fn set_dark(&self, dark: bool) {
            self.applied.borrow_mut().push(dark);
        }
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, _key: &str, _value: &str) -> ClientResult<()> {
            Err(ClientError::storage("storage disabled"))
        }

        fn remove(&self, _key: &str) -> ClientResult<()> {
            Ok(())
        }
    }

    fn stored(storage: &MemoryStore) -> Settings {
        storage.get_json(STORAGE_KEY_SETTINGS).unwrap().unwrap()
    }

    #[test]
    fn test_empty_storage_resolves_to_defaults_and_applies_theme() {
        let theme = RecordingTheme::default();
        let store = SettingsStore::load(MemoryStore::new(), theme.clone());

        assert_eq!(store.settings(), &Settings::default());
        assert_eq!(*theme.applied.borrow(), vec![false]);
    }

    #[test]
    fn test_partial_storage_is_completed() {
        let storage = MemoryStore::new();
        storage
            .set(STORAGE_KEY_SETTINGS, r#"{"theme":"dark","tta":true}"#)
            .unwrap();
        let theme = RecordingTheme::default();
        let store = SettingsStore::load(storage, theme.clone());

        assert_eq!(store.settings().theme, Theme::Dark);
        assert!(store.settings().tta);
        assert_eq!(store.settings().language, Language::ZhCn);
        assert_eq!(store.settings().model, ModelChoice::Resnet50);
        assert_eq!(theme.last(), Some(true));
    }

    #[test]
    fn test_load_writes_resolved_settings_back() {
        let storage = MemoryStore::new();
        storage.set(STORAGE_KEY_SETTINGS, "{not json").unwrap();
        let store = SettingsStore::load(storage.clone(), RecordingTheme::default());
        assert_eq!(store.settings(), &Settings::default());
        assert_eq!(stored(&storage), Settings::default());

        let storage = MemoryStore::new();
        storage
            .set(STORAGE_KEY_SETTINGS, r#"{"theme":"dark","confidenceThreshold":7}"#)
            .unwrap();
        let store = SettingsStore::load(storage.clone(), RecordingTheme::default());
        let persisted = stored(&storage);
        assert_eq!(&persisted, store.settings());
        assert_eq!(persisted.theme, Theme::Dark);
        assert_eq!(persisted.confidence_threshold, 1.0);
        assert_eq!(persisted.model, ModelChoice::Resnet50);

        let storage = MemoryStore::new();
        SettingsStore::load(storage.clone(), RecordingTheme::default());
        assert_eq!(stored(&storage), Settings::default());
    }

    #[test]
    fn test_load_survives_unwritable_storage() {
        let theme = RecordingTheme::default();
        theme.system_dark.set(true);
        let store = SettingsStore::load(ReadOnlyStore, theme.clone());

        assert_eq!(store.settings(), &Settings::default());
        assert_eq!(*theme.applied.borrow(), vec![Theme::default().is_dark(true)]);
    }

    #[test]
    fn test_every_change_is_persisted() {
        let storage = MemoryStore::new();
        let mut store = SettingsStore::load(storage.clone(), RecordingTheme::default());

        store.change(|s| s.confidence_threshold = 0.6).unwrap();
        assert_eq!(stored(&storage).confidence_threshold, 0.6);

        store.change(|s| s.notify_alert = false).unwrap();
        let persisted = stored(&storage);
        assert!(!persisted.notify_alert);
        assert_eq!(persisted.confidence_threshold, 0.6);
    }

    #[test]
    fn test_change_normalizes_out_of_range_threshold() {
        let storage = MemoryStore::new();
        let mut store = SettingsStore::load(storage.clone(), RecordingTheme::default());

        store.change(|s| s.confidence_threshold = 3.0).unwrap();
        assert_eq!(store.settings().confidence_threshold, 1.0);
        assert_eq!(stored(&storage).confidence_threshold, 1.0);
    }

    #[test]
    fn test_dark_and_light_toggle_document_state() {
        let theme = RecordingTheme::default();
        theme.system_dark.set(true);
        let mut store = SettingsStore::load(MemoryStore::new(), theme.clone());

        store.set_theme(Theme::Dark).unwrap();
        assert_eq!(theme.last(), Some(true));

        store.set_theme(Theme::Light).unwrap();
        assert_eq!(theme.last(), Some(false));
        assert!(!store.is_dark());
    }

    #[test]
    fn test_auto_samples_system_preference_at_write_time() {
        let theme = RecordingTheme::default();
        let mut store = SettingsStore::load(MemoryStore::new(), theme.clone());

        theme.system_dark.set(true);
        store.set_theme(Theme::Auto).unwrap();
        assert_eq!(theme.last(), Some(true));

        // 系统偏好变化不会自动生效
        theme.system_dark.set(false);
        assert_eq!(theme.last(), Some(true));

        // 直到显式重新应用
        store.reapply_theme();
        assert_eq!(theme.last(), Some(false));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let storage = MemoryStore::new();
        let mut store = SettingsStore::load(storage.clone(), RecordingTheme::default());
        store
            .change(|s| {
                s.theme = Theme::Dark;
                s.weekly_report = true;
            })
            .unwrap();

        store.reset().unwrap();
        assert_eq!(store.settings(), &Settings::default());
        assert_eq!(stored(&storage), Settings::default());
    }

    #[test]
    fn test_persistence_failure_keeps_change_in_memory() {
        let theme = RecordingTheme::default();
        let mut store = SettingsStore::load(ReadOnlyStore, theme.clone());

        let err = store.set_theme(Theme::Dark).unwrap_err();
        assert_eq!(err.status, ClientErrorStatus::Storage);
        assert_eq!(err.spans(), ["settings.persist"]);
        assert_eq!(store.settings().theme, Theme::Dark);
        assert_eq!(theme.last(), Some(true));
    }
}
