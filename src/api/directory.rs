use super::client::{ApiClient, ApiRequest};
use super::error::ApiOutcome;
use crate::types::{Doctor, Hospital, HospitalId};

impl ApiClient {
    pub async fn list_doctors(&self) -> ApiOutcome<Vec<Doctor>> {
        let locale = self.locale().as_str();
        self.fetch(ApiRequest::get(format!("api/{locale}/doctors/")))
            .await
    }

    pub async fn list_hospitals(&self) -> ApiOutcome<Vec<Hospital>> {
        self.fetch(ApiRequest::get("api/hospitals/")).await
    }

    pub async fn get_hospital(&self, id: &HospitalId) -> ApiOutcome<Hospital> {
        self.fetch(ApiRequest::get(format!("api/hospitals/{id}/")))
            .await
    }
}
