//! 用户偏好设置模型
//!
//! 以单个 JSON 对象持久化（键名采用 camelCase）。
//! 加载是逐字段宽松的：缺失或非法的字段取默认值，保证结果始终完整有效。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    /// 跟随系统配色偏好
    Auto,
}

impl Theme {
    /// 解析为是否启用暗色
    ///
    /// `prefers_dark` 为写入时刻采样到的系统偏好。
    pub fn is_dark(&self, prefers_dark: bool) -> bool {
        match self {
            Theme::Light => false,
            Theme::Dark => true,
            Theme::Auto => prefers_dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            "auto" => Some(Theme::Auto),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en-US")]
    EnUs,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::ZhCn => "zh-CN",
            Language::EnUs => "en-US",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "zh-CN" => Some(Language::ZhCn),
            "en-US" => Some(Language::EnUs),
            _ => None,
        }
    }
}

/// 后端可选的推理模型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelChoice {
    #[default]
    Resnet50,
    MobilenetV3Large,
}

impl ModelChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelChoice::Resnet50 => "resnet50",
            ModelChoice::MobilenetV3Large => "mobilenet_v3_large",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "resnet50" => Some(ModelChoice::Resnet50),
            "mobilenet_v3_large" => Some(ModelChoice::MobilenetV3Large),
            _ => None,
        }
    }
}

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.75;

const SETTING_KEYS: [&str; 9] = [
    "theme",
    "language",
    "animations",
    "confidenceThreshold",
    "model",
    "tta",
    "notifyComplete",
    "notifyAlert",
    "weeklyReport",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,
    pub language: Language,
    pub animations: bool,
    pub confidence_threshold: f64,
    pub model: ModelChoice,
    /// 测试时增强 (test-time augmentation)
    pub tta: bool,
    pub notify_complete: bool,
    pub notify_alert: bool,
    pub weekly_report: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            language: Language::ZhCn,
            animations: true,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            model: ModelChoice::Resnet50,
            tta: false,
            notify_complete: true,
            notify_alert: true,
            weekly_report: false,
        }
    }
}

/// 从 JSON 对象中取出单个字段，类型不符时返回 None
fn field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Option<T> {
    map.get(key)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

impl Settings {
    /// 从持久化的 JSON 文本解析设置
    ///
    /// 返回值第二项表示是否有字段被默认值替换（用于日志提示）。
    pub fn from_json_lenient(raw: &str) -> (Self, bool) {
        let defaults = Self::default();
        let map = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            _ => return (defaults, true),
        };

        let mut patched = SETTING_KEYS.iter().any(|k| !map.contains_key(*k));

        let mut settings = Self {
            theme: field(&map, "theme").unwrap_or(defaults.theme),
            language: field(&map, "language").unwrap_or(defaults.language),
            animations: field(&map, "animations").unwrap_or(defaults.animations),
            confidence_threshold: field(&map, "confidenceThreshold")
                .unwrap_or(defaults.confidence_threshold),
            model: field(&map, "model").unwrap_or(defaults.model),
            tta: field(&map, "tta").unwrap_or(defaults.tta),
            notify_complete: field(&map, "notifyComplete").unwrap_or(defaults.notify_complete),
            notify_alert: field(&map, "notifyAlert").unwrap_or(defaults.notify_alert),
            weekly_report: field(&map, "weeklyReport").unwrap_or(defaults.weekly_report),
        };
        if settings.normalize() {
            patched = true;
        }

        // 存在但类型不符的字段也算被替换
        let round_trip = serde_json::to_value(&settings).ok();
        if let Some(Value::Object(resolved)) = round_trip {
            for (key, value) in &map {
                if let Some(resolved_value) = resolved.get(key) {
                    if !json_equivalent(resolved_value, value) {
                        patched = true;
                    }
                }
            }
        }

        (settings, patched)
    }

    /// 修正越界取值，返回是否发生了修正
    pub fn normalize(&mut self) -> bool {
        let t = self.confidence_threshold;
        if !t.is_finite() {
            self.confidence_threshold = DEFAULT_CONFIDENCE_THRESHOLD;
            return true;
        }
        let clamped = t.clamp(0.0, 1.0);
        if clamped != t {
            self.confidence_threshold = clamped;
            return true;
        }
        false
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// 数字按数值比较，其余按结构比较
fn json_equivalent(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stored_shape() {
        let json = Settings::default().to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["theme"], "light");
        assert_eq!(value["language"], "zh-CN");
        assert_eq!(value["confidenceThreshold"], 0.75);
        assert_eq!(value["model"], "resnet50");
        assert_eq!(value["notifyComplete"], true);
        assert_eq!(value["weeklyReport"], false);
    }

    #[test]
    fn test_full_object_loads_unpatched() {
        let raw = r#"{"theme":"dark","language":"en-US","animations":false,
            "confidenceThreshold":0.5,"model":"mobilenet_v3_large","tta":true,
            "notifyComplete":false,"notifyAlert":false,"weeklyReport":true}"#;
        let (settings, patched) = Settings::from_json_lenient(raw);
        assert!(!patched);
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.language, Language::EnUs);
        assert_eq!(settings.model, ModelChoice::MobilenetV3Large);
        assert_eq!(settings.confidence_threshold, 0.5);
        assert!(settings.tta);
        assert!(settings.weekly_report);
    }

    #[test]
    fn test_partial_object_is_completed_with_defaults() {
        let (settings, patched) = Settings::from_json_lenient(r#"{"theme":"auto"}"#);
        assert!(patched);
        assert_eq!(settings.theme, Theme::Auto);
        assert_eq!(settings.language, Language::ZhCn);
        assert_eq!(settings.confidence_threshold, DEFAULT_CONFIDENCE_THRESHOLD);
        assert!(settings.animations);
    }

    #[test]
    fn test_invalid_fields_fall_back_individually() {
        let (settings, patched) =
            Settings::from_json_lenient(r#"{"theme":"purple","animations":"yes","tta":true}"#);
        assert!(patched);
        assert_eq!(settings.theme, Theme::Light);
        assert!(settings.animations);
        assert!(settings.tta);
    }

    #[test]
    fn test_garbage_yields_defaults() {
        for raw in ["", "not json", "[1,2]", "null"] {
            let (settings, patched) = Settings::from_json_lenient(raw);
            assert!(patched);
            assert_eq!(settings, Settings::default());
        }
    }

    #[test]
    fn test_threshold_is_clamped() {
        let (settings, patched) =
            Settings::from_json_lenient(r#"{"confidenceThreshold": 1.7}"#);
        assert!(patched);
        assert_eq!(settings.confidence_threshold, 1.0);

        let mut s = Settings::default();
        s.confidence_threshold = -0.2;
        assert!(s.normalize());
        assert_eq!(s.confidence_threshold, 0.0);
    }

    #[test]
    fn test_theme_resolution() {
        assert!(!Theme::Light.is_dark(true));
        assert!(Theme::Dark.is_dark(false));
        assert!(Theme::Auto.is_dark(true));
        assert!(!Theme::Auto.is_dark(false));
    }
}
