use comrak::plugins::syntect::SyntectAdapter;
use comrak::{ComrakOptions, ComrakPlugins, markdown_to_html_with_plugins};
use dioxus::events::Key;
use dioxus::prelude::*;
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Duration;

use crate::api::ApiError;
use crate::chat::LocationProvider;
use crate::session::Session;

const TOAST_LIFETIME: Duration = Duration::from_secs(4);

static MARKDOWN_OPTIONS: Lazy<ComrakOptions> = Lazy::new(|| {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.autolink = true;
    options
});

/// Render AI replies. Raw HTML from the server is escaped.
pub fn markdown_to_html(md: &str) -> String {
    let adapter = SyntectAdapter::new(Some("base16-ocean.dark"));
    let mut plugins = ComrakPlugins::default();
    plugins.render.codefence_syntax_highlighter = Some(&adapter);
    markdown_to_html_with_plugins(md, &MARKDOWN_OPTIONS, &plugins)
}

pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) if p > 0.0 => {
            let whole = p.round() as i64;
            let digits = whole.to_string();
            let mut grouped = String::new();
            for (i, ch) in digits.chars().enumerate() {
                if i > 0 && (digits.len() - i) % 3 == 0 {
                    grouped.push(' ');
                }
                grouped.push(ch);
            }
            format!("{grouped} UZS")
        }
        _ => "Price on request".to_string(),
    }
}

// ============================================
// Context values
// ============================================

/// Signed-in flag mirrored from the [`Session`] so views re-render on change.
#[derive(Clone, Copy, PartialEq)]
pub struct AuthState(pub Signal<bool>);

impl AuthState {
    pub fn is_signed_in(&self) -> bool {
        (self.0)()
    }
}

/// Device position source shared by every composer.
#[derive(Clone)]
pub struct Locator(pub Arc<dyn LocationProvider>);

#[derive(Clone, Debug, PartialEq)]
pub enum ToastKind {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToastMessage {
    pub id: u64,
    pub kind: ToastKind,
    pub text: String,
}

#[derive(Clone, Copy, PartialEq)]
pub struct Toasts {
    items: Signal<Vec<ToastMessage>>,
    counter: Signal<u64>,
}

impl Toasts {
    pub fn new(items: Signal<Vec<ToastMessage>>, counter: Signal<u64>) -> Self {
        Self { items, counter }
    }

    pub fn info(&self, text: impl Into<String>) {
        self.push(ToastKind::Info, text.into());
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(ToastKind::Error, text.into());
    }

    fn push(&self, kind: ToastKind, text: String) {
        let mut items = self.items;
        let mut counter = self.counter;
        let id = counter() + 1;
        counter.set(id);
        items.with_mut(|list| list.push(ToastMessage { id, kind, text }));
        spawn(async move {
            tokio::time::sleep(TOAST_LIFETIME).await;
            items.with_mut(|list| list.retain(|t| t.id != id));
        });
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FailureReaction {
    SignIn,
    NotPermitted,
    Retry,
}

fn reaction_to(err: &ApiError) -> FailureReaction {
    if err.needs_sign_in() {
        FailureReaction::SignIn
    } else if matches!(err, ApiError::Forbidden) {
        FailureReaction::NotPermitted
    } else {
        FailureReaction::Retry
    }
}

/// Boundary for API failures: log, toast, and drop to sign-in when the
/// session is missing or rejected. A forbidden resource keeps the session.
pub fn report_api_error(toasts: Toasts, auth: AuthState, session: &Session, context: &str, err: &ApiError) {
    tracing::error!(%context, error = %err, "request failed");
    match reaction_to(err) {
        FailureReaction::SignIn => {
            if let Err(e) = session.sign_out() {
                tracing::warn!(error = %e, "could not clear stored session");
            }
            let mut flag = auth.0;
            flag.set(false);
            toasts.error("Please sign in to continue.");
        }
        FailureReaction::NotPermitted => {
            toasts.error(format!("{context}. Not available for this account."))
        }
        FailureReaction::Retry => toasts.error(format!("{context}. Please try again.")),
    }
}

// ============================================
// Components
// ============================================

#[component]
pub fn ToastStack(items: Signal<Vec<ToastMessage>>) -> Element {
    rsx! {
        div { class: "toast-stack", aria_live: "polite",
            for toast in items() {
                div {
                    key: "{toast.id}",
                    class: format_args!(
                        "toast {}",
                        match toast.kind { ToastKind::Info => "info", ToastKind::Error => "error" }
                    ),
                    "{toast.text}"
                }
            }
        }
    }
}

/// Shows `children` only with a session; otherwise asks for an access token.
#[component]
pub fn SignInGate(children: Element) -> Element {
    let auth = use_context::<AuthState>();
    let session_ctx = use_context::<Session>();
    let session = use_signal(move || session_ctx);
    let toasts = use_context::<Toasts>();
    let mut token_input = use_signal(String::new);

    if auth.is_signed_in() {
        return rsx! { {children} };
    }

    let mut submit = move || {
        let token = token_input();
        let session = session.read();
        match session.sign_in(&token) {
            Ok(()) => {
                token_input.set(String::new());
                let mut flag = auth.0;
                flag.set(true);
                toasts.info("Signed in.");
            }
            Err(err) => {
                tracing::warn!(error = %err, "sign in failed");
                if session.is_signed_in() {
                    let mut flag = auth.0;
                    flag.set(true);
                }
                toasts.error(err);
            }
        }
    };

    rsx! {
        div { class: "sign-in",
            h3 { class: "section-title", "Sign in" }
            p { class: "text-muted", "Paste the access token from your DiagnoAI account." }
            div { class: "hstack",
                input {
                    r#type: "password",
                    placeholder: "Access token",
                    value: "{token_input}",
                    oninput: move |ev| token_input.set(ev.value()),
                    onkeydown: move |ev| {
                        if ev.key() == Key::Enter {
                            ev.prevent_default();
                            submit();
                        }
                    },
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: token_input().trim().is_empty(),
                    onclick: move |_| submit(),
                    "Sign in"
                }
            }
        }
    }
}
