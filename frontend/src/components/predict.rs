use crate::api::describe_error;
use crate::auth::use_auth;
use crate::components::icons::Upload;
use crate::components::layout::ErrorAlert;
use crate::format::{confidence_badge, health_badge, percent};
use crate::settings::use_settings;
use cropvision_shared::PredictionResult;
use cropvision_shared::diseases::chinese_name;
use cropvision_shared::protocol::PredictUpload;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlInputElement, Url};

const ACCEPTED_TYPES: &str = "image/jpeg,image/png,image/webp";

/// 读取用户选择的文件内容
async fn read_file(file: &File) -> Result<PredictUpload, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("读取文件失败: {:?}", e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(PredictUpload {
        file_name: file.name(),
        content_type: file.type_(),
        bytes,
    })
}

/// 病害识别页面：选择图片 -> 预览 -> 上传识别 -> 展示结果
#[component]
pub fn PredictPage() -> impl IntoView {
    let auth = use_auth();
    let settings = use_settings().settings();

    let (upload, set_upload) = signal(Option::<PredictUpload>::None);
    let (preview_url, set_preview_url) = signal(Option::<String>::None);
    let (result, set_result) = signal(Option::<PredictionResult>::None);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let replace_preview = move |url: Option<String>| {
        if let Some(old) = preview_url.get_untracked() {
            let _ = Url::revoke_object_url(&old);
        }
        set_preview_url.set(url);
    };

    on_cleanup(move || {
        if let Some(old) = preview_url.get_untracked() {
            let _ = Url::revoke_object_url(&old);
        }
    });

    let on_file_change = move |ev: leptos::ev::Event| {
        let Some(file) = ev
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
        else {
            return;
        };

        set_result.set(None);
        set_error_msg.set(None);
        replace_preview(Url::create_object_url_with_blob(&file).ok());

        spawn_local(async move {
            match read_file(&file).await {
                Ok(data) => set_upload.set(Some(data)),
                Err(e) => {
                    web_sys::console::error_1(&e.clone().into());
                    set_error_msg.set(Some(e));
                }
            }
        });
    };

    let on_submit = move |_| {
        let Some(data) = upload.get() else {
            set_error_msg.set(Some("请先选择一张图片".to_string()));
            return;
        };
        let api = auth.api();
        set_is_submitting.set(true);
        set_error_msg.set(None);
        spawn_local(async move {
            match api.predict().upload(data).await {
                Ok(prediction) => set_result.set(Some(prediction)),
                Err(e) => set_error_msg.set(Some(describe_error("识别", &e))),
            }
            set_is_submitting.set(false);
        });
    };

    let threshold = move || settings.with(|s| s.confidence_threshold);

    view! {
        <ErrorAlert message=error_msg />

        <div class="grid gap-8 md:grid-cols-2">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"上传图片"</h3>
                    <p class="text-base-content/70 text-sm">"支持 JPG / PNG / WebP 格式的叶片照片"</p>
                    <input
                        type="file"
                        accept=ACCEPTED_TYPES
                        class="file-input file-input-bordered w-full"
                        on:change=on_file_change
                    />
                    <Show when=move || preview_url.get().is_some()>
                        <img
                            class="rounded-box max-h-80 object-contain mx-auto"
                            src=move || preview_url.get().unwrap_or_default()
                            alt="preview"
                        />
                    </Show>
                    <div class="card-actions justify-end">
                        <button
                            class="btn btn-primary gap-2"
                            on:click=on_submit
                            disabled=move || is_submitting.get() || upload.with(|u| u.is_none())
                        >
                            {move || if is_submitting.get() {
                                view! { <span class="loading loading-spinner"></span> "识别中..." }.into_any()
                            } else {
                                view! { <Upload attr:class="h-4 w-4" /> "开始识别" }.into_any()
                            }}
                        </button>
                    </div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"识别结果"</h3>
                    {move || match result.get() {
                        None => view! {
                            <p class="text-base-content/50 py-8 text-center">"上传图片后在此查看结果"</p>
                        }.into_any(),
                        Some(prediction) => {
                            let threshold = threshold();
                            let confident = prediction.is_confident(threshold);
                            view! {
                                <div class="space-y-4">
                                    <div class="flex items-center gap-2">
                                        <span class=health_badge(&prediction.predicted_class)>
                                            {chinese_name(&prediction.predicted_class)}
                                        </span>
                                        <span class=confidence_badge(prediction.confidence, threshold)>
                                            {percent(prediction.confidence)}
                                        </span>
                                    </div>
                                    <Show when=move || !confident>
                                        <div role="alert" class="alert alert-warning text-sm py-2">
                                            <span>{format!("置信度低于阈值 {}，结果仅供参考", percent(threshold))}</span>
                                        </div>
                                    </Show>
                                    <ul class="space-y-2">
                                        {prediction.top_predictions.iter().map(|p| view! {
                                            <li class="flex items-center gap-2">
                                                <span class="w-40 truncate">{chinese_name(&p.class_name)}</span>
                                                <progress class="progress progress-primary flex-1" value=p.confidence.to_string() max="1"></progress>
                                                <span class="font-mono text-xs w-14 text-right">{percent(p.confidence)}</span>
                                            </li>
                                        }).collect_view()}
                                    </ul>
                                </div>
                            }.into_any()
                        }
                    }}
                </div>
            </div>
        </div>
    }
}
