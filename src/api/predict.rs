use cropvision_shared::PredictionResult;
use cropvision_shared::protocol::{PREDICT_FILE_FIELD, PredictUpload};

use super::ApiClient;
use crate::error::ClientResult;
use crate::request::{FilePart, HttpClient};

pub struct PredictApi<'a, C: HttpClient> {
    pub(super) api: &'a ApiClient<C>,
}

impl<C: HttpClient> PredictApi<'_, C> {
    /// 上传图片进行病害识别
    pub async fn upload(&self, upload: PredictUpload) -> ClientResult<PredictionResult> {
        let http = self.api.request_for(&upload).with_file(FilePart {
            field: PREDICT_FILE_FIELD.to_string(),
            file_name: upload.file_name,
            content_type: upload.content_type,
            bytes: upload.bytes,
        });
        self.api.execute::<PredictUpload>(http, "predict.upload").await
    }
}
