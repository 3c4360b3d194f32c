//! 文档主题
//!
//! 暗色模式通过 `<html>` 元素上的 `dark` class 切换，
//! 系统偏好通过 `prefers-color-scheme` 媒体查询读取。

use cropvision::settings::ThemeApplier;
use wasm_bindgen::prelude::*;

const DARK_CLASS: &str = "dark";
const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

fn dark_media_query() -> Option<web_sys::MediaQueryList> {
    web_sys::window()?.match_media(DARK_QUERY).ok()?
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentTheme;

impl ThemeApplier for DocumentTheme {
    fn prefers_dark(&self) -> bool {
        dark_media_query().is_some_and(|mq| mq.matches())
    }

    fn set_dark(&self, dark: bool) {
        let Some(root) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        else {
            return;
        };
        let classes = root.class_list();
        let result = if dark {
            classes.add_1(DARK_CLASS)
        } else {
            classes.remove_1(DARK_CLASS)
        };
        if let Err(e) = result {
            web_sys::console::error_1(&format!("[Theme] 切换主题失败: {:?}", e).into());
        }
    }
}

/// 监听系统配色偏好变化
///
/// 监听器随页面存活，闭包被泄漏。
pub fn on_system_theme_change<F>(callback: F)
where
    F: Fn() + 'static,
{
    let Some(mq) = dark_media_query() else {
        return;
    };
    let closure = Closure::<dyn Fn()>::new(callback);
    if mq
        .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
        .is_err()
    {
        web_sys::console::warn_1(&"[Theme] 无法监听系统配色变化".into());
    }
    closure.forget();
}
