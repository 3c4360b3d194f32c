use cropvision_shared::protocol::{StatsOverviewRequest, StatsTrendRequest};
use cropvision_shared::{StatsOverview, TrendResponse};

use super::ApiClient;
use crate::error::ClientResult;
use crate::request::HttpClient;

pub struct StatsApi<'a, C: HttpClient> {
    pub(super) api: &'a ApiClient<C>,
}

impl<C: HttpClient> StatsApi<'_, C> {
    pub async fn overview(&self) -> ClientResult<StatsOverview> {
        let http = self.api.request_for(&StatsOverviewRequest);
        self.api.execute::<StatsOverviewRequest>(http, "stats.overview").await
    }

    /// 趋势统计；未指定的日期范围与粒度由后端决定（默认最近 30 天、按天）
    pub async fn trend(&self, query: StatsTrendRequest) -> ClientResult<TrendResponse> {
        let http = self.api.request_for(&query);
        self.api.execute::<StatsTrendRequest>(http, "stats.trend").await
    }
}
