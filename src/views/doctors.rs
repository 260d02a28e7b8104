use dioxus::prelude::*;

use crate::api::{ApiClient, ApiOutcome};
use crate::chat::DiagnosisRoute;
use crate::types::Doctor;
use crate::views::shared::format_price;

/// Doctors recommended for the current chat, in the order the server gave.
#[component]
pub fn DoctorSidebar(route: Signal<DiagnosisRoute>, on_book: EventHandler<Doctor>) -> Element {
    let api = use_context::<ApiClient>();
    let doctors = use_resource(move || {
        let ids = route.read().doctor_ids.clone();
        let api = api.clone();
        async move {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            api.get_doctors(&ids).await
        }
    });

    let body = match &*doctors.read() {
        None => rsx! { p { class: "text-muted", "Loading doctors…" } },
        Some(Err(err)) => {
            tracing::warn!(error = %err, "recommended doctors unavailable");
            rsx! { p { class: "text-muted", "Recommended doctors are unavailable right now." } }
        }
        Some(Ok(list)) if list.is_empty() => rsx! { p { class: "text-muted", "No doctors to recommend." } },
        Some(Ok(list)) => rsx! {
            for doctor in list.iter().cloned() {
                DoctorCard { key: "{doctor.id}", doctor: doctor.clone(), on_book, compact: true }
            }
        },
    };

    rsx! {
        aside { class: "doctor-sidebar",
            h3 { class: "section-title", "Recommended doctors" }
            {body}
        }
    }
}

#[component]
pub fn DoctorCard(doctor: Doctor, on_book: EventHandler<Doctor>, compact: bool) -> Element {
    let price = format_price(doctor.price);
    let field = doctor.field.clone().unwrap_or_default();
    let description = doctor.description.clone().unwrap_or_default();
    let book_target = doctor.clone();
    let class = if compact {
        "doctor-card compact"
    } else {
        "doctor-card"
    };
    rsx! {
        div { class,
            if let Some(image) = doctor.image.as_ref() {
                img { class: "doctor-photo", src: "{image}", alt: "{doctor.name}" }
            }
            div { class: "doctor-info",
                h4 { "{doctor.name}" }
                if !field.is_empty() { span { class: "tag-pill tag-pill-compact", "{field}" } }
                if !compact && !description.is_empty() {
                    p { class: "text-muted", "{description}" }
                }
                span { class: "doctor-price", "{price}" }
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                onclick: move |_| on_book.call(book_target.clone()),
                "Book"
            }
        }
    }
}

/// Full doctor directory for the configured locale.
#[component]
pub fn DoctorsView(on_book: EventHandler<Doctor>) -> Element {
    let api = use_context::<ApiClient>();
    let mut query = use_signal(String::new);
    let doctors = use_resource(move || {
        let api = api.clone();
        async move { api.list_doctors().await }
    });

    let needle = query().trim().to_lowercase();
    let body = match &*doctors.read() {
        None => rsx! { p { class: "text-muted", "Loading…" } },
        Some(ApiOutcome::Ok(list)) => {
            let shown: Vec<Doctor> = list
                .iter()
                .filter(|d| {
                    needle.is_empty()
                        || d.name.to_lowercase().contains(&needle)
                        || d.field
                            .as_deref()
                            .is_some_and(|f| f.to_lowercase().contains(&needle))
                })
                .cloned()
                .collect();
            rsx! {
                if shown.is_empty() {
                    p { class: "text-muted", "No doctors match your search." }
                }
                div { class: "doctor-grid",
                    for doctor in shown {
                        DoctorCard { key: "{doctor.id}", doctor: doctor.clone(), on_book, compact: false }
                    }
                }
            }
        }
        Some(ApiOutcome::NotFound) => rsx! { p { class: "text-muted", "No doctors listed yet." } },
        Some(ApiOutcome::Failed(err)) => {
            tracing::warn!(error = %err, "doctor list unavailable");
            rsx! { p { class: "text-muted", "Could not load doctors." } }
        }
    };

    rsx! {
        div { class: "main-container",
            div { class: "settings-section",
                h3 { class: "section-title", "Doctors" }
                input {
                    r#type: "search",
                    placeholder: "Search by name or specialty",
                    value: "{query}",
                    oninput: move |ev| query.set(ev.value()),
                }
            }
            {body}
        }
    }
}
