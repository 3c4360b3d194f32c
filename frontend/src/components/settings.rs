use crate::settings::use_settings;
use cropvision::error::ClientResult;
use cropvision_shared::settings::{Language, ModelChoice, Settings, Theme};
use leptos::prelude::*;

/// 偏好设置页面：每次修改立即持久化并应用
#[component]
pub fn SettingsPage() -> impl IntoView {
    let ctx = use_settings();
    let settings = ctx.settings();
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let report = move |result: ClientResult<()>| match result {
        Ok(()) => set_error_msg.set(None),
        Err(e) => set_error_msg.set(Some(format!("设置保存失败: {}", e.message()))),
    };
    let update = move |f: Box<dyn FnOnce(&mut Settings)>| report(ctx.change(f));

    let toggle = move |label: &'static str, get: fn(&Settings) -> bool, set: fn(&mut Settings, bool)| {
        view! {
            <label class="label cursor-pointer">
                <span class="label-text">{label}</span>
                <input
                    type="checkbox"
                    class="toggle toggle-primary"
                    prop:checked=move || settings.with(get)
                    on:change=move |ev| {
                        let checked = event_target_checked(&ev);
                        update(Box::new(move |s| set(s, checked)));
                    }
                />
            </label>
        }
    };

    view! {
        <Show when=move || error_msg.get().is_some()>
            <div role="alert" class="alert alert-error text-sm py-2">
                <span>{move || error_msg.get().unwrap_or_default()}</span>
            </div>
        </Show>

        <div class="grid gap-8 md:grid-cols-2">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"外观与语言"</h3>
                    <div class="form-control">
                        <label class="label"><span class="label-text">"主题"</span></label>
                        <select class="select select-bordered"
                            on:change=move |ev| {
                                if let Some(theme) = Theme::parse(&event_target_value(&ev)) {
                                    update(Box::new(move |s| s.theme = theme));
                                }
                            }
                        >
                            <option value="light" selected=move || settings.with(|s| s.theme == Theme::Light)>"浅色"</option>
                            <option value="dark" selected=move || settings.with(|s| s.theme == Theme::Dark)>"深色"</option>
                            <option value="auto" selected=move || settings.with(|s| s.theme == Theme::Auto)>"跟随系统"</option>
                        </select>
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">"语言"</span></label>
                        <select class="select select-bordered"
                            on:change=move |ev| {
                                if let Some(language) = Language::parse(&event_target_value(&ev)) {
                                    update(Box::new(move |s| s.language = language));
                                }
                            }
                        >
                            <option value="zh-CN" selected=move || settings.with(|s| s.language == Language::ZhCn)>"简体中文"</option>
                            <option value="en-US" selected=move || settings.with(|s| s.language == Language::EnUs)>"English"</option>
                        </select>
                    </div>
                    {toggle("界面动画", |s| s.animations, |s, v| s.animations = v)}
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"识别"</h3>
                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"置信度阈值"</span>
                            <span class="label-text-alt font-mono">
                                {move || format!("{:.2}", settings.with(|s| s.confidence_threshold))}
                            </span>
                        </label>
                        <input
                            type="range"
                            min="0"
                            max="1"
                            step="0.05"
                            class="range range-primary range-sm"
                            prop:value=move || settings.with(|s| s.confidence_threshold.to_string())
                            on:change=move |ev| {
                                if let Ok(value) = event_target_value(&ev).parse::<f64>() {
                                    update(Box::new(move |s| s.confidence_threshold = value));
                                }
                            }
                        />
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">"识别模型"</span></label>
                        <select class="select select-bordered"
                            on:change=move |ev| {
                                if let Some(model) = ModelChoice::parse(&event_target_value(&ev)) {
                                    update(Box::new(move |s| s.model = model));
                                }
                            }
                        >
                            <option value="resnet50" selected=move || settings.with(|s| s.model == ModelChoice::Resnet50)>"ResNet-50（精度优先）"</option>
                            <option value="mobilenet_v3_large" selected=move || settings.with(|s| s.model == ModelChoice::MobilenetV3Large)>"MobileNetV3-Large（速度优先）"</option>
                        </select>
                    </div>
                    {toggle("测试时增强 (TTA)", |s| s.tta, |s, v| s.tta = v)}
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"通知"</h3>
                    {toggle("识别完成提醒", |s| s.notify_complete, |s, v| s.notify_complete = v)}
                    {toggle("病害预警", |s| s.notify_alert, |s, v| s.notify_alert = v)}
                    {toggle("每周报告", |s| s.weekly_report, |s, v| s.weekly_report = v)}
                </div>
            </div>
        </div>

        <div class="flex justify-end">
            <button class="btn btn-outline" on:click=move |_| report(ctx.reset())>"恢复默认设置"</button>
        </div>
    }
}
