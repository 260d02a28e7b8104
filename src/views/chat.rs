use dioxus::events::Key;
use dioxus::prelude::*;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

use crate::api::{ApiClient, ApiError};
use crate::chat::{
    ChatComposer, DiagnosisRoute, TYPEWRITER_STEP, TYPEWRITER_TICK, Typewriter,
    resolve_coordinates, submit_chat,
};
use crate::types::{Attachment, ChatId, Message, MessageId};
use crate::views::shared::{Locator, markdown_to_html};

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:24 padding:zero]:[minute padding:zero]");

fn format_message_timestamp(timestamp: Option<OffsetDateTime>) -> Option<String> {
    let mut datetime = timestamp?;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

fn guess_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

fn base_name(path: &str) -> String {
    path.rsplit(['/', '\\']).next().unwrap_or(path).to_string()
}

/// Read-only transcript. Only `reveal` is typed out; everything else is
/// shown as it is.
#[component]
pub fn MessageList(messages: Vec<Message>, reveal: Option<MessageId>, waiting: bool) -> Element {
    rsx! {
        div { id: "chat-list", class: "chat-list",
            if messages.is_empty() && !waiting {
                div { class: "chat-empty",
                    h3 { "Describe your symptoms" }
                    p { class: "text-muted",
                        "Tell the assistant what bothers you. You can attach test results or photos."
                    }
                }
            }
            for msg in messages.iter() {
                div {
                    key: "{msg.id}",
                    class: format_args!("message-row {}", if msg.is_user { "user" } else { "assistant" }),
                    if !msg.is_user { div { class: "avatar assistant", "AI" } }
                    div { class: "message-stack",
                        div { class: format_args!("bubble {}", if msg.is_user { "user" } else { "assistant" }),
                            if msg.is_user {
                                "{msg.content}"
                            } else {
                                AssistantBubble {
                                    content: msg.content.clone(),
                                    animate: reveal.as_ref() == Some(&msg.id),
                                }
                            }
                        }
                        if let Some(ts) = format_message_timestamp(msg.created_at) {
                            div { class: format_args!(
                                    "message-meta {}",
                                    if msg.is_user { "align-end" } else { "align-start" }
                                ),
                                span { class: "message-timestamp", "{ts}" }
                            }
                        }
                    }
                }
            }
            if waiting {
                div { class: "message-row assistant",
                    div { class: "avatar assistant", "AI" }
                    div { class: "shimmer-line",
                        span { class: "shimmer-text", "Analyzing…" }
                    }
                }
            }
        }
    }
}

#[component]
fn AssistantBubble(content: String, animate: bool) -> Element {
    let mut writer = use_signal(|| {
        if animate {
            Typewriter::new(content.clone())
        } else {
            Typewriter::finished(content.clone())
        }
    });

    use_future(move || async move {
        while writer.with_mut(|w| w.advance(TYPEWRITER_STEP)) {
            tokio::time::sleep(TYPEWRITER_TICK).await;
        }
    });

    let copy_payload = content.clone();
    let on_copy = move |_| {
        let raw = copy_payload.clone();
        spawn(async move {
            #[cfg(any(feature = "desktop", feature = "mobile"))]
            {
                if let Ok(mut cb) = arboard::Clipboard::new() {
                    let _ = cb.set_text(raw);
                }
            }
            #[cfg(not(any(feature = "desktop", feature = "mobile")))]
            let _ = raw;
        });
    };

    let done = writer.read().is_done();
    if done {
        let content_html = markdown_to_html(&content);
        rsx! {
            div { class: "bubble-controls",
                div { class: "actions",
                    button { class: "action-btn", title: "Copy text", onclick: on_copy, "Copy" }
                }
            }
            div { class: "md", dangerous_inner_html: "{content_html}" }
        }
    } else {
        let visible = writer.read().visible().to_string();
        rsx! {
            div { class: "md typing", "{visible}" span { class: "caret", "▍" } }
        }
    }
}

/// Symptom input. Creates a chat when `selected` is `None`, appends otherwise.
#[component]
pub fn ChatForm(
    selected: Option<ChatId>,
    on_pending: EventHandler<String>,
    on_sent: EventHandler<DiagnosisRoute>,
    on_failed: EventHandler<ApiError>,
) -> Element {
    let api = use_context::<ApiClient>();
    let locator = use_context::<Locator>();
    let mut composer = use_signal(ChatComposer::new);

    let send = use_callback(move |()| {
        let Some(draft) = composer.with_mut(|c| c.begin_submit()) else {
            return;
        };
        on_pending.call(draft.message.clone());
        let api = api.clone();
        let locator = locator.clone();
        let target = selected.clone();
        spawn(async move {
            let timeout = api.config().location_timeout;
            let coordinates = resolve_coordinates(locator.0.as_ref(), timeout).await;
            let submission = draft.with_coordinates(coordinates);
            match submit_chat(&api, target.as_ref(), submission).await {
                Ok(route) => {
                    composer.with_mut(|c| c.finish_success());
                    on_sent.call(route);
                }
                Err(err) => {
                    composer.with_mut(|c| c.finish_failure());
                    on_failed.call(err);
                }
            }
        });
    });

    let on_files = move |ev: FormEvent| async move {
        let Some(engine) = ev.files() else {
            return;
        };
        for name in engine.files() {
            match engine.read_file(&name).await {
                Some(bytes) => {
                    let file_name = base_name(&name);
                    let mime = guess_mime(&file_name).to_string();
                    composer.with_mut(|c| {
                        c.attach(Attachment {
                            file_name,
                            mime,
                            bytes,
                        })
                    });
                }
                None => tracing::warn!(file = %name, "could not read attachment"),
            }
        }
    };

    let state = composer.read().clone();
    let submitting = state.is_submitting();
    let text = state.text().to_string();

    rsx! {
        form { class: "composer no-divider",
            div { class: "composer-inner",
                if !state.files().is_empty() {
                    div { class: "attachments",
                        for (i, file) in state.files().iter().enumerate() {
                            span { class: "tag-pill tag-pill-compact",
                                "{file.file_name}"
                                button {
                                    class: "pill-remove",
                                    r#type: "button",
                                    disabled: submitting,
                                    onclick: move |_| composer.with_mut(|c| c.detach(i)),
                                    "×"
                                }
                            }
                        }
                    }
                }
                div { class: "hstack", style: "gap: 0.5rem; width: 100%; align-items: flex-end;",
                    label { class: "btn btn-ghost file-picker",
                        "Attach"
                        input {
                            r#type: "file",
                            multiple: true,
                            accept: "image/*,.pdf,.txt",
                            disabled: submitting,
                            style: "display: none;",
                            onchange: on_files,
                        }
                    }
                    textarea {
                        rows: "1",
                        placeholder: "Headache, fever since yesterday…",
                        value: "{text}",
                        oninput: move |ev| composer.with_mut(|c| c.set_text(ev.value())),
                        onkeydown: move |ev| {
                            if ev.key() == Key::Enter && !ev.modifiers().shift() {
                                ev.prevent_default();
                                send.call(());
                            }
                        },
                        disabled: submitting,
                        autofocus: true,
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: !state.can_submit(),
                        onclick: move |_| send.call(()),
                        if submitting { "Sending…" } else { "Send" }
                    }
                }
            }
        }
    }
}
