use std::sync::Arc;

use dioxus::prelude::*;

use crate::api::ApiClient;
use crate::chat::{ConfiguredLocation, DiagnosisRoute, LocationProvider, UnavailableLocation};
use crate::config::ClientConfig;
use crate::session::{Session, TokenStore};
use crate::types::Doctor;
use crate::views::shared::{AuthState, Locator, SignInGate, ToastStack, Toasts};
use crate::views::{BookingDialog, BookingsView, DiagnosisView, DoctorsView, HospitalsView};

const DIAGNOAI_CSS: Asset = asset!("/assets/diagnoai.css");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AppTab {
    Diagnosis,
    Doctors,
    Hospitals,
    Bookings,
}

#[component]
pub fn App() -> Element {
    let config = use_context::<ClientConfig>();
    let session = use_context_provider(|| {
        Session::restore(config.access_token.clone(), TokenStore::platform())
    });
    {
        let config = config.clone();
        let session = session.clone();
        use_context_provider(move || ApiClient::new(config, session));
    }
    use_context_provider(|| {
        let provider: Arc<dyn LocationProvider> = match config.device_location {
            Some(coordinates) => Arc::new(ConfiguredLocation(coordinates)),
            None => Arc::new(UnavailableLocation),
        };
        Locator(provider)
    });
    let signed_in = use_signal(|| session.is_signed_in());
    use_context_provider(|| AuthState(signed_in));
    let toast_items = use_signal(Vec::new);
    let toast_counter = use_signal(|| 0u64);
    use_context_provider(|| Toasts::new(toast_items, toast_counter));

    let active_tab = use_signal(|| AppTab::Diagnosis);
    let route = use_signal(DiagnosisRoute::base);
    let mut booking_target = use_signal(|| Option::<Doctor>::None);
    let on_book = move |doctor: Doctor| booking_target.set(Some(doctor));

    rsx! {
        document::Link { rel: "stylesheet", href: DIAGNOAI_CSS }
        AppHeader { active_tab }
        TabPanels { active_tab, route, on_book }
        if let Some(doctor) = booking_target() {
            BookingDialog { doctor, on_close: move |_| booking_target.set(None) }
        }
        ToastStack { items: toast_items }
    }
}

#[component]
fn AppHeader(active_tab: Signal<AppTab>) -> Element {
    rsx! {
        div { class: "header no-divider",
            div { class: "header-content",
                span { class: "wordmark", "DiagnoAI" }
                TabNavigation { active_tab }
            }
        }
    }
}

#[component]
fn TabPanels(
    active_tab: Signal<AppTab>,
    route: Signal<DiagnosisRoute>,
    on_book: EventHandler<Doctor>,
) -> Element {
    rsx! {
        div { class: "tab-panels",
            TabPanel {
                active_tab,
                tab: AppTab::Diagnosis,
                children: rsx!( SignInGate { DiagnosisView { route, on_book } } ),
            }
            TabPanel {
                active_tab,
                tab: AppTab::Doctors,
                children: rsx!( DoctorsView { on_book } ),
            }
            TabPanel {
                active_tab,
                tab: AppTab::Hospitals,
                children: rsx!( HospitalsView {} ),
            }
            TabPanel {
                active_tab,
                tab: AppTab::Bookings,
                children: rsx!( BookingsView {} ),
            }
        }
    }
}

#[component]
fn TabPanel(active_tab: Signal<AppTab>, tab: AppTab, children: Element) -> Element {
    let is_active = active_tab() == tab;
    let class_suffix = if is_active { "active" } else { "" };
    rsx! {
        div {
            class: format_args!("tab-panel {}", class_suffix),
            aria_hidden: (!is_active).to_string(),
            {children}
        }
    }
}

#[component]
fn TabNavigation(active_tab: Signal<AppTab>) -> Element {
    rsx! {
        div { class: "tabs",
            TabButton { active_tab, tab: AppTab::Diagnosis, label: "AI diagnosis" }
            TabButton { active_tab, tab: AppTab::Doctors, label: "Doctors" }
            TabButton { active_tab, tab: AppTab::Hospitals, label: "Hospitals" }
            TabButton { active_tab, tab: AppTab::Bookings, label: "Bookings" }
        }
    }
}

#[component]
fn TabButton(active_tab: Signal<AppTab>, tab: AppTab, label: &'static str) -> Element {
    let mut active_tab = active_tab;
    let class = if active_tab() == tab {
        "tab active"
    } else {
        "tab"
    };
    rsx! {
        h1 {
            class: class,
            onclick: move |_| active_tab.set(tab),
            "{label}"
        }
    }
}
