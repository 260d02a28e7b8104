use dioxus::prelude::*;

use crate::api::{ApiClient, ApiError, ApiOutcome};
use crate::booking::{BookingBoard, BookingStatus};
use crate::session::Session;
use crate::types::{Booking, BookingId};
use crate::views::shared::{AuthState, SignInGate, Toasts, report_api_error};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BookingScope {
    Patient,
    Doctor,
}

impl BookingScope {
    fn label(self) -> &'static str {
        match self {
            BookingScope::Patient => "My appointments",
            BookingScope::Doctor => "Doctor panel",
        }
    }
}

fn step_label(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Pending => "Reopen",
        BookingStatus::Confirmed => "Confirm",
        BookingStatus::Cancelled => "Cancel",
        BookingStatus::Completed => "Complete",
    }
}

/// Appointments of the signed-in user, either as a patient or as a doctor.
#[component]
pub fn BookingsView() -> Element {
    rsx! {
        div { class: "main-container",
            SignInGate { BookingPanel {} }
        }
    }
}

#[component]
fn BookingPanel() -> Element {
    let api = use_context::<ApiClient>();
    let session = use_context::<Session>();
    let toasts = use_context::<Toasts>();
    let auth = use_context::<AuthState>();
    let scope = use_signal(|| BookingScope::Patient);
    let mut board = use_signal(BookingBoard::default);
    let mut loading = use_signal(|| true);
    let mut forbidden = use_signal(|| false);
    let mut busy = use_signal(|| Option::<BookingId>::None);

    {
        let api = api.clone();
        let session = session.clone();
        use_effect(move || {
            let current = scope();
            let api = api.clone();
            let session = session.clone();
            loading.set(true);
            forbidden.set(false);
            spawn(async move {
                let outcome = match current {
                    BookingScope::Patient => api.my_bookings().await,
                    BookingScope::Doctor => api.doctor_bookings().await,
                };
                if *scope.peek() != current {
                    return;
                }
                match outcome {
                    ApiOutcome::Ok(list) => board.set(BookingBoard::new(list)),
                    ApiOutcome::NotFound => board.set(BookingBoard::default()),
                    ApiOutcome::Failed(ApiError::Forbidden) => {
                        tracing::info!(scope = ?current, "bookings not available for this account");
                        board.set(BookingBoard::default());
                        forbidden.set(true);
                    }
                    ApiOutcome::Failed(err) => {
                        board.set(BookingBoard::default());
                        report_api_error(toasts, auth, &session, "Could not load bookings", &err);
                    }
                }
                loading.set(false);
            });
        });
    }

    let on_status = {
        let api = api.clone();
        let session = session.clone();
        move |(id, next): (BookingId, BookingStatus)| {
            if busy.peek().is_some() {
                return;
            }
            if let Err(err) = board.read().check_transition(&id, next) {
                toasts.error(err.to_string());
                return;
            }
            busy.set(Some(id.clone()));
            let api = api.clone();
            let session = session.clone();
            spawn(async move {
                match api.update_booking_status(&id, next).await {
                    ApiOutcome::Ok(()) => {
                        if let Err(err) = board.with_mut(|b| b.apply_status(&id, next)) {
                            tracing::warn!(error = %err, "status accepted for a booking no longer listed");
                        }
                        toasts.info(format!("Booking marked {next}."));
                    }
                    ApiOutcome::NotFound => {
                        board.with_mut(|b| b.remove(&id));
                        toasts.error("This booking no longer exists.");
                    }
                    ApiOutcome::Failed(err) => {
                        report_api_error(toasts, auth, &session, "Could not update the booking", &err)
                    }
                }
                busy.set(None);
            });
        }
    };

    let on_delete = {
        let api = api.clone();
        let session = session.clone();
        move |id: BookingId| {
            if busy.peek().is_some() {
                return;
            }
            busy.set(Some(id.clone()));
            let api = api.clone();
            let session = session.clone();
            spawn(async move {
                match api.delete_booking(&id).await {
                    ApiOutcome::Ok(()) | ApiOutcome::NotFound => {
                        board.with_mut(|b| b.remove(&id));
                        toasts.info("Booking deleted.");
                    }
                    ApiOutcome::Failed(err) => {
                        report_api_error(toasts, auth, &session, "Could not delete the booking", &err)
                    }
                }
                busy.set(None);
            });
        }
    };

    let bookings = board.read().bookings().to_vec();
    let current = scope();
    let scope_label = current.label();
    let pending_id = busy();

    rsx! {
        div { class: "settings-section",
            div { class: "tabs",
                ScopeTab { scope, option: BookingScope::Patient }
                ScopeTab { scope, option: BookingScope::Doctor }
            }
        }
        if loading() {
            p { class: "text-muted", "Loading…" }
        } else if forbidden() {
            p { class: "text-muted", "{scope_label} is not available for this account." }
        } else if bookings.is_empty() {
            p { class: "text-muted", "No bookings yet." }
        } else {
            ul { class: "booking-list",
                for booking in bookings {
                    BookingRow {
                        key: "{booking.id}",
                        busy: pending_id.as_ref() == Some(&booking.id),
                        manage: current == BookingScope::Doctor,
                        booking: booking.clone(),
                        on_status: on_status.clone(),
                        on_delete: on_delete.clone(),
                    }
                }
            }
        }
    }
}

#[component]
fn ScopeTab(scope: Signal<BookingScope>, option: BookingScope) -> Element {
    let mut scope = scope;
    let class = if scope() == option { "tab active" } else { "tab" };
    let label = option.label();
    rsx! {
        button {
            class,
            r#type: "button",
            onclick: move |_| scope.set(option),
            "{label}"
        }
    }
}

#[component]
fn BookingRow(
    booking: Booking,
    busy: bool,
    manage: bool,
    on_status: EventHandler<(BookingId, BookingStatus)>,
    on_delete: EventHandler<BookingId>,
) -> Element {
    let when = booking.appointment_date.replace('T', " ");
    let status = booking.status;
    let steps: &[BookingStatus] = if manage { status.next_steps() } else { &[] };
    let delete_id = booking.id.clone();
    rsx! {
        li { class: "booking-row",
            div { class: "booking-info",
                span { class: "booking-when", "{when}" }
                span { class: "tag-pill tag-pill-compact status-{status}", "{status}" }
            }
            div { class: "actions",
                for step in steps.iter().copied() {
                    StepButton { key: "{step}", id: booking.id.clone(), step, busy, on_status }
                }
                button {
                    class: "btn btn-danger",
                    r#type: "button",
                    disabled: busy,
                    onclick: move |_| on_delete.call(delete_id.clone()),
                    "Delete"
                }
            }
        }
    }
}

#[component]
fn StepButton(
    id: BookingId,
    step: BookingStatus,
    busy: bool,
    on_status: EventHandler<(BookingId, BookingStatus)>,
) -> Element {
    let label = step_label(step);
    rsx! {
        button {
            class: "btn",
            r#type: "button",
            disabled: busy,
            onclick: move |_| on_status.call((id.clone(), step)),
            "{label}"
        }
    }
}
