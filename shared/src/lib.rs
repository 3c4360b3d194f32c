use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub mod diseases;
pub mod protocol;
pub mod route;
pub mod settings;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const STORAGE_KEY_USER: &str = "user";
pub const STORAGE_KEY_TOKEN: &str = "token";
pub const STORAGE_KEY_SETTINGS: &str = "app-settings";

pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const HEADER_AUTHORIZATION: &str = "Authorization";

/// 模型输出标签中作物与病害之间的分隔符
pub const LABEL_SEPARATOR: &str = "___";

// =========================================================
// 用户与认证 (Identity)
// =========================================================

pub const DEFAULT_ROLE: &str = "user";

/// 持久化到 `user` 键下的身份信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub role: String,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role: DEFAULT_ROLE.to_string(),
        }
    }
}

/// `POST /auth/token` 的表单字段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
}

/// 注册成功后后端返回的用户信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_superuser: bool,
    pub created_at: NaiveDateTime,
}

// =========================================================
// 识别结果 (Prediction)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPrediction {
    #[serde(rename = "class")]
    pub class_name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_class: String,
    pub confidence: f64,
    pub image_url: String,
    #[serde(default)]
    pub top_predictions: Vec<TopPrediction>,
}

impl PredictionResult {
    /// 置信度是否达到用户设定的阈值
    pub fn is_confident(&self, threshold: f64) -> bool {
        self.confidence >= threshold
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: i64,
    pub image_path: String,
    pub predicted_class: String,
    pub confidence: f64,
    pub created_at: NaiveDateTime,
}

impl PredictionRecord {
    /// 上传图片的访问路径（与 `PredictionResult::image_url` 同构）
    pub fn image_url(&self) -> String {
        format!("/uploads/{}", self.image_path)
    }
}

// =========================================================
// 历史记录操作 (History)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchDeleteResponse {
    pub success: bool,
    pub deleted_count: u64,
    #[serde(default)]
    pub deleted_files: u64,
}

// =========================================================
// 统计 (Stats)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassCount {
    #[serde(rename = "class")]
    pub class_name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropCount {
    pub crop: String,
    pub count: u64,
    pub healthy: u64,
    pub diseased: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StatsOverview {
    pub total: u64,
    pub today_count: u64,
    pub healthy_count: u64,
    pub diseased_count: u64,
    pub healthy_rate: f64,
    #[serde(default)]
    pub by_class: Vec<ClassCount>,
    #[serde(default)]
    pub by_crop: Vec<CropCount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "day" => Some(Granularity::Day),
            "week" => Some(Granularity::Week),
            "month" => Some(Granularity::Month),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: chrono::NaiveDate,
    pub total: u64,
    pub healthy: u64,
    pub diseased: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TrendResponse {
    #[serde(default)]
    pub data: Vec<TrendPoint>,
}

// =========================================================
// 标签工具 (Label helpers)
// =========================================================

/// 与后端统计口径一致：标签中包含 `healthy`（不区分大小写）即视为健康
pub fn is_healthy(label: &str) -> bool {
    label.to_lowercase().contains("healthy")
}

/// 提取标签中的作物部分，例如 `Tomato___Late_blight` -> `Tomato`
pub fn crop_of(label: &str) -> &str {
    label.split(LABEL_SEPARATOR).next().unwrap_or(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_helpers() {
        assert!(is_healthy("Tomato___healthy"));
        assert!(is_healthy("Apple___Healthy"));
        assert!(!is_healthy("Tomato___Late_blight"));

        assert_eq!(crop_of("Corn_(maize)___Common_rust_"), "Corn_(maize)");
        assert_eq!(crop_of("background"), "background");
    }

    #[test]
    fn test_prediction_result_parses_backend_payload() {
        let json = r#"{
            "predicted_class": "Tomato___Late_blight",
            "confidence": 0.9132,
            "image_url": "/uploads/abc.jpg",
            "top_predictions": [
                {"class": "Tomato___Late_blight", "confidence": 0.9132},
                {"class": "Potato___Late_blight", "confidence": 0.05}
            ]
        }"#;
        let result: PredictionResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.top_predictions.len(), 2);
        assert_eq!(result.top_predictions[1].class_name, "Potato___Late_blight");
        assert!(result.is_confident(0.75));
        assert!(!result.is_confident(0.95));
    }

    #[test]
    fn test_prediction_result_without_top_predictions() {
        let json = r#"{"predicted_class": "Apple___healthy", "confidence": 0.5, "image_url": "/uploads/x.png"}"#;
        let result: PredictionResult = serde_json::from_str(json).unwrap();
        assert!(result.top_predictions.is_empty());
    }

    #[test]
    fn test_record_parses_naive_timestamp() {
        let json = r#"{
            "id": 7,
            "image_path": "f.jpg",
            "predicted_class": "Grape___Black_rot",
            "confidence": 0.8,
            "created_at": "2024-05-01T08:30:15.123456"
        }"#;
        let record: PredictionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.image_url(), "/uploads/f.jpg");
        assert_eq!(record.created_at.format("%Y-%m-%d").to_string(), "2024-05-01");
    }

    #[test]
    fn test_stats_and_trend_payloads() {
        let json = r#"{
            "total": 10, "today_count": 2, "healthy_count": 4, "diseased_count": 6,
            "healthy_rate": 0.4,
            "by_class": [{"class": "Tomato___healthy", "count": 4}],
            "by_crop": [{"crop": "Tomato", "count": 10, "healthy": 4, "diseased": 6}]
        }"#;
        let stats: StatsOverview = serde_json::from_str(json).unwrap();
        assert_eq!(stats.by_class[0].class_name, "Tomato___healthy");
        assert_eq!(stats.by_crop[0].diseased, 6);

        let trend: TrendResponse = serde_json::from_str(
            r#"{"data": [{"date": "2024-05-01", "total": 3, "healthy": 1, "diseased": 2}]}"#,
        )
        .unwrap();
        assert_eq!(trend.data[0].date.to_string(), "2024-05-01");
    }

    #[test]
    fn test_granularity_round_trip_names() {
        for g in [Granularity::Day, Granularity::Week, Granularity::Month] {
            assert_eq!(Granularity::parse(g.as_str()), Some(g));
        }
        assert_eq!(Granularity::parse("year"), None);
    }
}
