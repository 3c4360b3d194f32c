//! 展示格式化工具

use chrono::NaiveDateTime;

/// 0.9134 -> "91.3%"
pub fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

pub fn timestamp(at: &NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// 按置信度选择徽章样式
pub fn confidence_badge(confidence: f64, threshold: f64) -> &'static str {
    if confidence >= threshold {
        "badge badge-success"
    } else {
        "badge badge-warning"
    }
}

/// 健康标签与病害标签的徽章样式
pub fn health_badge(label: &str) -> &'static str {
    if cropvision_shared::is_healthy(label) {
        "badge badge-success badge-outline"
    } else {
        "badge badge-error badge-outline"
    }
}
