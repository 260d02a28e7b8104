use dioxus::prelude::*;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::api::{ApiClient, ApiOutcome};
use crate::booking::{appointment_timestamp, bookable_hours, format_date, parse_date, slot_label};
use crate::session::Session;
use crate::types::Doctor;
use crate::views::shared::{AuthState, SignInGate, Toasts, format_price, report_api_error};

fn local_now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    PrimitiveDateTime::new(now.date(), now.time())
}

fn today() -> Date {
    local_now().date()
}

/// Modal for booking `doctor`: pick a date, then a free hour.
#[component]
pub fn BookingDialog(doctor: Doctor, on_close: EventHandler<()>) -> Element {
    let api = use_context::<ApiClient>();
    let session = use_context::<Session>();
    let toasts = use_context::<Toasts>();
    let auth = use_context::<AuthState>();
    let mut date = use_signal(today);
    let mut booking = use_signal(|| false);

    let on_pick = {
        let doctor = doctor.clone();
        move |hour: u8| {
            if booking() {
                return;
            }
            let Some(appointment) = appointment_timestamp(date(), hour) else {
                tracing::warn!(hour, "hour outside the bookable range");
                return;
            };
            booking.set(true);
            let api = api.clone();
            let session = session.clone();
            let doctor_id = doctor.id.clone();
            spawn(async move {
                match api.create_booking(&doctor_id, &appointment).await {
                    ApiOutcome::Ok(created) => {
                        tracing::info!(booking = %created.id, "booking created");
                        toasts.info(format!("Booked for {}.", appointment.replace('T', " ")));
                        on_close.call(());
                    }
                    ApiOutcome::NotFound => toasts.error("This doctor is no longer available."),
                    ApiOutcome::Failed(err) => {
                        report_api_error(toasts, auth, &session, "Could not create the booking", &err)
                    }
                }
                booking.set(false);
            });
        }
    };

    let date_value = format_date(date());
    let min_date = format_date(today());
    let price = format_price(doctor.price);

    rsx! {
        div { class: "modal-overlay", onclick: move |_| on_close.call(()),
            div { class: "modal", onclick: move |ev| ev.stop_propagation(),
                div { class: "modal-header",
                    h3 { "Book {doctor.name}" }
                    button { class: "action-btn", r#type: "button", onclick: move |_| on_close.call(()), "Close" }
                }
                p { class: "text-muted", "{price}" }
                SignInGate {
                    label { class: "field",
                        "Date"
                        input {
                            r#type: "date",
                            value: "{date_value}",
                            min: "{min_date}",
                            oninput: move |ev| {
                                if let Some(picked) = parse_date(&ev.value()) {
                                    date.set(picked);
                                }
                            },
                        }
                    }
                    TimeSlotGrid { doctor: doctor.clone(), date, busy: booking(), on_pick }
                }
            }
        }
    }
}

/// Free hours of the day for `doctor` on `date`.
#[component]
pub fn TimeSlotGrid(doctor: Doctor, date: Signal<Date>, busy: bool, on_pick: EventHandler<u8>) -> Element {
    let api = use_context::<ApiClient>();
    let doctor_id = doctor.id.clone();
    let booked = use_resource(move || {
        let day = date();
        let api = api.clone();
        let doctor_id = doctor_id.clone();
        async move { api.booked_times(&doctor_id, day).await }
    });

    let content = match &*booked.read() {
        None => rsx! { p { class: "text-muted", "Checking availability…" } },
        Some(ApiOutcome::Failed(err)) => {
            tracing::warn!(error = %err, "booked times unavailable");
            rsx! { p { class: "text-muted", "Could not load free times." } }
        }
        Some(outcome) => {
            let taken: &[String] = match outcome {
                ApiOutcome::Ok(times) => times,
                _ => &[],
            };
            let slots: Vec<(u8, String)> = bookable_hours(taken, date(), local_now())
                .into_iter()
                .map(|hour| (hour, slot_label(hour)))
                .collect();
            rsx! {
                if slots.is_empty() {
                    p { class: "text-muted", "No free times on this day." }
                }
                div { class: "slot-grid",
                    for (hour, label) in slots {
                        button {
                            key: "{hour}",
                            class: "slot",
                            r#type: "button",
                            disabled: busy,
                            onclick: move |_| on_pick.call(hour),
                            "{label}"
                        }
                    }
                }
            }
        }
    };

    rsx! {
        div { class: "time-slots", {content} }
    }
}
