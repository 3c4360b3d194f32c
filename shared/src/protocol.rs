use crate::{
    BatchDeleteResponse, DeleteResponse, Granularity, LoginForm, PredictionRecord,
    PredictionResult, RegisterRequest, RegisteredUser, StatsOverview, TokenResponse,
    TrendResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize + DeserializeOwned {
    /// The response type returned by this request.
    type Response: Serialize + DeserializeOwned;
    /// The URL path, relative to the API base.
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// Resolved path. Endpoints with path parameters override this.
    fn path(&self) -> String {
        Self::PATH.to_string()
    }

    /// Query string pairs sent with the request.
    fn query(&self) -> Vec<(String, String)> {
        Vec::new()
    }
}

// =========================================================
// Predict
// =========================================================

/// Upload an image for classification (multipart field `file`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub const PREDICT_FILE_FIELD: &str = "file";

impl ApiRequest for PredictUpload {
    type Response = PredictionResult;
    const PATH: &'static str = "/predict";
    const METHOD: HttpMethod = HttpMethod::Post;
}

// =========================================================
// History
// =========================================================

/// List history records, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListHistoryRequest {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl ApiRequest for ListHistoryRequest {
    type Response = Vec<PredictionRecord>;
    const PATH: &'static str = "/history";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn query(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(skip) = self.skip {
            pairs.push(("skip".to_string(), skip.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryDetailRequest {
    pub id: i64,
}

impl ApiRequest for HistoryDetailRequest {
    type Response = PredictionRecord;
    const PATH: &'static str = "/history";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteHistoryRequest {
    pub id: i64,
}

impl ApiRequest for DeleteHistoryRequest {
    type Response = DeleteResponse;
    const PATH: &'static str = "/history";
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("{}/{}", Self::PATH, self.id)
    }
}

/// Delete several records at once; the ids travel in a JSON body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchDeleteRequest {
    pub ids: Vec<i64>,
}

impl ApiRequest for BatchDeleteRequest {
    type Response = BatchDeleteResponse;
    const PATH: &'static str = "/history/batch";
    const METHOD: HttpMethod = HttpMethod::Delete;
}

// =========================================================
// Stats
// =========================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsOverviewRequest;

impl ApiRequest for StatsOverviewRequest {
    type Response = StatsOverview;
    const PATH: &'static str = "/stats";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsTrendRequest {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub granularity: Option<Granularity>,
}

impl ApiRequest for StatsTrendRequest {
    type Response = TrendResponse;
    const PATH: &'static str = "/stats/trend";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn query(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(start) = self.start_date {
            pairs.push(("start_date".to_string(), start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date".to_string(), end.format("%Y-%m-%d").to_string()));
        }
        if let Some(granularity) = self.granularity {
            pairs.push(("granularity".to_string(), granularity.as_str().to_string()));
        }
        pairs
    }
}

// =========================================================
// Auth
// =========================================================

/// OAuth2 password flow, sent form-encoded
impl ApiRequest for LoginForm {
    type Response = TokenResponse;
    const PATH: &'static str = "/auth/token";
    const METHOD: HttpMethod = HttpMethod::Post;
}

impl ApiRequest for RegisterRequest {
    type Response = RegisteredUser;
    const PATH: &'static str = "/auth/register";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameterized_paths() {
        assert_eq!(HistoryDetailRequest { id: 42 }.path(), "/history/42");
        assert_eq!(DeleteHistoryRequest { id: 3 }.path(), "/history/3");
        assert_eq!(BatchDeleteRequest { ids: vec![1] }.path(), "/history/batch");
    }

    #[test]
    fn test_history_query_omits_unset_fields() {
        assert!(ListHistoryRequest::default().query().is_empty());

        let req = ListHistoryRequest {
            skip: Some(20),
            limit: Some(10),
        };
        assert_eq!(
            req.query(),
            vec![
                ("skip".to_string(), "20".to_string()),
                ("limit".to_string(), "10".to_string())
            ]
        );
    }

    #[test]
    fn test_trend_query_formats_dates() {
        let req = StatsTrendRequest {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 5),
            end_date: None,
            granularity: Some(Granularity::Week),
        };
        assert_eq!(
            req.query(),
            vec![
                ("start_date".to_string(), "2024-01-05".to_string()),
                ("granularity".to_string(), "week".to_string())
            ]
        );
    }
}
