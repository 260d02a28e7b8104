//! DiagnoAI telehealth client.
//!
//! The non-UI modules (`api`, `chat`, `booking`, `session`, `config`) hold all
//! of the client-side behaviour and are usable without a renderer. `ui` and
//! `views` are the Dioxus front end on top of them.

pub mod api;
pub mod booking;
pub mod chat;
pub mod config;
pub mod session;
pub mod types;
pub mod ui;
pub mod views;
