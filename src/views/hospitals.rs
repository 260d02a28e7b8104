use dioxus::prelude::*;

use crate::api::{ApiClient, ApiOutcome};
use crate::types::{Hospital, HospitalId};

#[component]
pub fn HospitalsView() -> Element {
    let api = use_context::<ApiClient>();
    let mut opened = use_signal(|| Option::<HospitalId>::None);
    let hospitals = use_resource(move || {
        let api = api.clone();
        async move { api.list_hospitals().await }
    });

    if let Some(id) = opened() {
        return rsx! {
            div { class: "main-container",
                HospitalDetail { key: "{id}", id: id.clone(), on_back: move |_| opened.set(None) }
            }
        };
    }

    let body = match &*hospitals.read() {
        None => rsx! { p { class: "text-muted", "Loading…" } },
        Some(ApiOutcome::Ok(list)) if list.is_empty() => {
            rsx! { p { class: "text-muted", "No hospitals listed yet." } }
        }
        Some(ApiOutcome::Ok(list)) => rsx! {
            ul { class: "hospital-list",
                for hospital in list.iter().cloned() {
                    HospitalRow {
                        key: "{hospital.id}",
                        hospital: hospital.clone(),
                        on_open: move |id: HospitalId| opened.set(Some(id)),
                    }
                }
            }
        },
        Some(ApiOutcome::NotFound) => rsx! { p { class: "text-muted", "No hospitals listed yet." } },
        Some(ApiOutcome::Failed(err)) => {
            tracing::warn!(error = %err, "hospital list unavailable");
            rsx! { p { class: "text-muted", "Could not load hospitals." } }
        }
    };

    rsx! {
        div { class: "main-container",
            h3 { class: "section-title", "Hospitals" }
            {body}
        }
    }
}

#[component]
fn HospitalRow(hospital: Hospital, on_open: EventHandler<HospitalId>) -> Element {
    let address = hospital.address.clone().unwrap_or_default();
    let id = hospital.id.clone();
    rsx! {
        li { class: "hospital-row", onclick: move |_| on_open.call(id.clone()),
            h4 { "{hospital.name}" }
            if !address.is_empty() {
                p { class: "text-muted", "{address}" }
            }
        }
    }
}

#[component]
fn HospitalDetail(id: HospitalId, on_back: EventHandler<()>) -> Element {
    let api = use_context::<ApiClient>();
    let hospital = use_resource(move || {
        let api = api.clone();
        let id = id.clone();
        async move { api.get_hospital(&id).await }
    });

    let body = match &*hospital.read() {
        None => rsx! { p { class: "text-muted", "Loading…" } },
        Some(ApiOutcome::Ok(h)) => {
            let address = h.address.clone().unwrap_or_default();
            let phone = h.phone.clone().unwrap_or_default();
            let description = h.description.clone().unwrap_or_default();
            rsx! {
                if let Some(image) = h.image.as_ref() {
                    img { class: "hospital-photo", src: "{image}", alt: "{h.name}" }
                }
                h3 { class: "section-title", "{h.name}" }
                if !address.is_empty() { p { "{address}" } }
                if !phone.is_empty() {
                    p { a { href: "tel:{phone}", "{phone}" } }
                }
                if !description.is_empty() {
                    p { class: "text-muted", "{description}" }
                }
            }
        }
        Some(ApiOutcome::NotFound) => rsx! { p { class: "text-muted", "This hospital is no longer listed." } },
        Some(ApiOutcome::Failed(err)) => {
            tracing::warn!(error = %err, "hospital detail unavailable");
            rsx! { p { class: "text-muted", "Could not load this hospital." } }
        }
    };

    rsx! {
        div { class: "hospital-detail",
            button { class: "btn btn-ghost", r#type: "button", onclick: move |_| on_back.call(()), "Back" }
            {body}
        }
    }
}
