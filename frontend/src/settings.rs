//! 偏好设置上下文
//!
//! 在 Leptos 信号中持有核心库的 `SettingsStore`，并在系统配色偏好变化时重新应用主题。

use cropvision::error::ClientResult;
use cropvision::settings::SettingsStore;
use cropvision_shared::settings::Settings;
use leptos::prelude::*;

use crate::web::{DocumentTheme, LocalStorage, on_system_theme_change};

pub type BrowserSettingsStore = SettingsStore<LocalStorage, DocumentTheme>;

#[derive(Clone, Copy)]
pub struct SettingsContext {
    pub state: ReadSignal<BrowserSettingsStore>,
    pub set_state: WriteSignal<BrowserSettingsStore>,
}

impl SettingsContext {
    /// 加载设置并立即应用主题
    pub fn new() -> Self {
        let (state, set_state) = signal(SettingsStore::load(LocalStorage, DocumentTheme));
        Self { state, set_state }
    }

    /// 当前设置的派生信号
    pub fn settings(&self) -> Signal<Settings> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.settings().clone()))
    }

    /// 修改设置：持久化并应用主题
    pub fn change<F>(&self, f: F) -> ClientResult<()>
    where
        F: FnOnce(&mut Settings),
    {
        let mut result = Ok(());
        self.set_state.update(|store| result = store.change(f));
        result
    }

    pub fn reset(&self) -> ClientResult<()> {
        let mut result = Ok(());
        self.set_state.update(|store| result = store.reset());
        result
    }
}

pub fn use_settings() -> SettingsContext {
    use_context::<SettingsContext>().expect("SettingsContext should be provided")
}

/// 系统配色偏好变化时重新应用主题（仅影响 `auto`）
pub fn init_settings(ctx: &SettingsContext) {
    let state = ctx.state;
    on_system_theme_change(move || state.with_untracked(|s| s.reapply_theme()));
}
