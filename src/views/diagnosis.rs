use dioxus::prelude::*;
use time::OffsetDateTime;

use crate::api::{ApiClient, ApiError, ApiOutcome};
use crate::chat::{ChatDirectory, DiagnosisRoute, RequestEpoch, TranscriptLoad};
use crate::session::Session;
use crate::types::{ChatId, Doctor, Message, MessageId};
use crate::views::chat::{ChatForm, MessageList};
use crate::views::doctors::DoctorSidebar;
use crate::views::shared::{AuthState, Toasts, report_api_error};

const PENDING_MESSAGE_ID: &str = "pending";

/// Page shell of the AI diagnosis feature.
///
/// Everything shown is derived from `route`: the transcript of
/// `route.chat_id` and the doctors in `route.doctor_ids`. Submitting the
/// form or picking a chat only changes the route.
#[component]
pub fn DiagnosisView(route: Signal<DiagnosisRoute>, on_book: EventHandler<Doctor>) -> Element {
    let mut route = route;
    let api = use_context::<ApiClient>();
    let session = use_context::<Session>();
    let toasts = use_context::<Toasts>();
    let auth = use_context::<AuthState>();

    let mut reload = use_signal(|| 0u64);
    let mut directory = use_signal(ChatDirectory::default);
    let mut transcript = use_signal(Vec::<Message>::new);
    let mut reveal = use_signal(|| Option::<MessageId>::None);
    let mut waiting = use_signal(|| false);
    let mut reveal_next = use_signal(|| false);
    let epoch = use_hook(RequestEpoch::new);

    {
        let epoch = epoch.clone();
        use_drop(move || epoch.invalidate());
    }

    // Chat list, once per mount.
    {
        let api = api.clone();
        let session = session.clone();
        use_future(move || {
            let api = api.clone();
            let session = session.clone();
            async move {
                match api.list_chats().await {
                    ApiOutcome::Ok(chats) => directory.with_mut(|d| d.replace(chats)),
                    ApiOutcome::NotFound => directory.with_mut(|d| d.replace(Vec::new())),
                    ApiOutcome::Failed(err) => {
                        report_api_error(toasts, auth, &session, "Could not load your chats", &err)
                    }
                }
            }
        });
    }

    // Transcript, whenever the route changes.
    {
        let api = api.clone();
        let session = session.clone();
        let epoch = epoch.clone();
        use_effect(move || {
            let current = route();
            reload();
            directory.with_mut(|d| d.select(current.chat_id.clone()));
            let token = epoch.begin();
            let api = api.clone();
            let session = session.clone();
            spawn(async move {
                let outcome = match &current.chat_id {
                    None => ApiOutcome::Ok(None),
                    Some(id) => api.get_chat(id).await.map(Some),
                };

                let loaded = match TranscriptLoad::settle(&token, outcome) {
                    TranscriptLoad::Stale => {
                        tracing::debug!("discarding transcript for a route that is no longer shown");
                        return;
                    }
                    TranscriptLoad::Empty => Some(Vec::new()),
                    TranscriptLoad::Loaded(chat) => {
                        directory.with_mut(|d| d.remember(&chat.id));
                        Some(chat.messages)
                    }
                    TranscriptLoad::Gone => {
                        toasts.error("This chat no longer exists.");
                        Some(Vec::new())
                    }
                    TranscriptLoad::Failed(err) => {
                        report_api_error(toasts, auth, &session, "Could not load the chat", &err);
                        None
                    }
                };
                waiting.set(false);
                let Some(messages) = loaded else {
                    // Keep whatever is on screen minus the optimistic entry.
                    transcript.with_mut(|list| list.retain(|m| m.id.as_str() != PENDING_MESSAGE_ID));
                    return;
                };
                if *reveal_next.peek() {
                    reveal_next.set(false);
                    reveal.set(messages.iter().rev().find(|m| !m.is_user).map(|m| m.id.clone()));
                } else {
                    reveal.set(None);
                }
                transcript.set(messages);
            });
        });
    }

    let on_pending = move |text: String| {
        waiting.set(true);
        transcript.with_mut(|list| {
            list.push(Message {
                id: MessageId::new(PENDING_MESSAGE_ID),
                content: text,
                is_user: true,
                created_at: Some(OffsetDateTime::now_utc()),
            })
        });
    };

    let on_sent = move |next: DiagnosisRoute| {
        tracing::info!(url = %next.to_url(), "navigating");
        reveal_next.set(true);
        if let Some(id) = &next.chat_id {
            directory.with_mut(|d| d.remember(id));
        }
        if *route.peek() == next {
            // Same URL, so the route effect would not fire on its own.
            reload.with_mut(|n| *n += 1);
        } else {
            route.set(next);
        }
    };

    let on_failed = {
        let session = session.clone();
        move |err: ApiError| {
            waiting.set(false);
            transcript.with_mut(|list| list.retain(|m| m.id.as_str() != PENDING_MESSAGE_ID));
            report_api_error(toasts, auth, &session, "Could not send your message", &err);
        }
    };

    let on_new_chat = move |_| {
        let next = directory.with_mut(|d| d.new_chat());
        route.set(next);
    };

    let on_delete = {
        let api = api.clone();
        let session = session.clone();
        move |id: ChatId| {
            let api = api.clone();
            let session = session.clone();
            spawn(async move {
                match api.delete_chat(&id).await {
                    ApiOutcome::Ok(()) | ApiOutcome::NotFound => {
                        let removal = directory.with_mut(|d| d.remove(&id));
                        if removal.cleared_selection || route.peek().chat_id.as_ref() == Some(&id) {
                            let next = directory.with_mut(|d| d.new_chat());
                            route.set(next);
                        }
                        toasts.info("Chat deleted.");
                    }
                    ApiOutcome::Failed(err) => {
                        report_api_error(toasts, auth, &session, "Could not delete the chat", &err)
                    }
                }
            });
        }
    };

    let chats = directory.read().chats().to_vec();
    let selected = directory.read().selected().cloned();
    let current_route = route();
    let messages = transcript();

    rsx! {
        div { class: "diagnosis-layout",
            aside { class: "chat-history",
                button { class: "btn btn-primary", r#type: "button", onclick: on_new_chat, "New chat" }
                ul { class: "chat-history-list",
                    for chat in chats {
                        ChatListItem {
                            key: "{chat.id}",
                            id: chat.id.clone(),
                            label: chat.label(),
                            active: selected.as_ref() == Some(&chat.id),
                            on_open: move |id: ChatId| route.set(DiagnosisRoute::for_chat(id, Vec::new())),
                            on_delete: on_delete.clone(),
                        }
                    }
                }
            }
            section { class: "main-container",
                div { class: "chat-wrap",
                    MessageList { messages, reveal: reveal(), waiting: waiting() }
                }
                ChatForm {
                    selected: current_route.chat_id.clone(),
                    on_pending,
                    on_sent,
                    on_failed,
                }
            }
            if !current_route.doctor_ids.is_empty() {
                DoctorSidebar { route, on_book }
            }
        }
    }
}

#[component]
fn ChatListItem(
    id: ChatId,
    label: String,
    active: bool,
    on_open: EventHandler<ChatId>,
    on_delete: EventHandler<ChatId>,
) -> Element {
    let open_id = id.clone();
    let class = if active {
        "chat-history-item active"
    } else {
        "chat-history-item"
    };
    rsx! {
        li { class,
            span {
                class: "chat-history-label",
                onclick: move |_| on_open.call(open_id.clone()),
                "{label}"
            }
            button {
                class: "action-btn",
                r#type: "button",
                title: "Delete chat",
                onclick: move |_| on_delete.call(id.clone()),
                "Delete"
            }
        }
    }
}
