use cropvision_shared::protocol::{
    BatchDeleteRequest, DeleteHistoryRequest, HistoryDetailRequest, ListHistoryRequest,
};
use cropvision_shared::{BatchDeleteResponse, DeleteResponse, PredictionRecord};

use super::ApiClient;
use crate::error::ClientResult;
use crate::request::HttpClient;

pub struct HistoryApi<'a, C: HttpClient> {
    pub(super) api: &'a ApiClient<C>,
}

impl<C: HttpClient> HistoryApi<'_, C> {
    /// 分页获取历史记录（后端按时间倒序）
    pub async fn list(&self, skip: Option<u32>, limit: Option<u32>) -> ClientResult<Vec<PredictionRecord>> {
        let req = ListHistoryRequest { skip, limit };
        let http = self.api.request_for(&req);
        self.api.execute::<ListHistoryRequest>(http, "history.list").await
    }

    pub async fn detail(&self, id: i64) -> ClientResult<PredictionRecord> {
        let req = HistoryDetailRequest { id };
        let http = self.api.request_for(&req);
        self.api.execute::<HistoryDetailRequest>(http, "history.detail").await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<DeleteResponse> {
        let req = DeleteHistoryRequest { id };
        let http = self.api.request_for(&req);
        self.api.execute::<DeleteHistoryRequest>(http, "history.delete").await
    }

    pub async fn batch_delete(&self, ids: Vec<i64>) -> ClientResult<BatchDeleteResponse> {
        let req = BatchDeleteRequest { ids };
        let http = self.api.request_for(&req).with_json(&req)?;
        self.api.execute::<BatchDeleteRequest>(http, "history.batch_delete").await
    }
}
