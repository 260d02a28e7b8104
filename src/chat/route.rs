use reqwest::Url;

use crate::types::{ChatId, DoctorId};

pub const DIAGNOSIS_PATH: &str = "/ai-diagnosis";

// Routes are app-local; a fixed origin lets `Url` do the query handling.
const ROUTE_ORIGIN: &str = "app:/";

/// Location of the diagnosis page: selected chat plus recommended doctors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagnosisRoute {
    pub chat_id: Option<ChatId>,
    pub doctor_ids: Vec<DoctorId>,
}

impl DiagnosisRoute {
    pub fn base() -> Self {
        Self::default()
    }

    pub fn for_chat(chat_id: ChatId, doctor_ids: Vec<DoctorId>) -> Self {
        Self {
            chat_id: Some(chat_id),
            doctor_ids,
        }
    }

    pub fn to_url(&self) -> String {
        let Ok(mut url) = Url::parse(ROUTE_ORIGIN).and_then(|origin| origin.join(DIAGNOSIS_PATH)) else {
            return DIAGNOSIS_PATH.to_string();
        };
        if self.chat_id.is_some() || !self.doctor_ids.is_empty() {
            let mut pairs = url.query_pairs_mut();
            if let Some(id) = &self.chat_id {
                pairs.append_pair("chatId", id.as_str());
            }
            if !self.doctor_ids.is_empty() {
                let joined = self
                    .doctor_ids
                    .iter()
                    .map(DoctorId::as_str)
                    .collect::<Vec<_>>()
                    .join(",");
                pairs.append_pair("doctorIds", &joined);
            }
        }
        match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_string(),
        }
    }

    /// Read a route back from a path, an absolute URL or a bare query string.
    /// Unknown keys are ignored.
    pub fn parse(raw: &str) -> Self {
        let relative = if !raw.contains('?') && raw.contains('=') {
            format!("?{raw}")
        } else {
            raw.to_string()
        };
        let Ok(url) = Url::parse(ROUTE_ORIGIN).and_then(|origin| origin.join(&relative)) else {
            return DiagnosisRoute::default();
        };

        let mut route = DiagnosisRoute::default();
        for (key, value) in url.query_pairs() {
            match &*key {
                "chatId" => {
                    route.chat_id = (!value.is_empty()).then(|| ChatId::new(value.into_owned()));
                }
                "doctorIds" => {
                    route.doctor_ids = value
                        .split(',')
                        .filter(|v| !v.is_empty())
                        .map(DoctorId::new)
                        .collect();
                }
                _ => {}
            }
        }
        route
    }
}
