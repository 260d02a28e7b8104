use futures::future::join_all;

use super::client::{ApiClient, ApiRequest};
use super::error::{ApiOutcome, ApiResult};
use super::transport::{FormField, FormValue, Method, RequestBody};
use crate::types::{Attachment, Chat, ChatId, ChatReply, ChatSummary, Coordinates, Doctor, DoctorId};

/// Payload shared by create-chat and update-chat.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatSubmission {
    pub message: String,
    pub files: Vec<Attachment>,
    pub coordinates: Coordinates,
}

impl ChatSubmission {
    pub fn into_body(self) -> RequestBody {
        let mut fields = vec![
            FormField::text("message", self.message),
            FormField::text("latitude", self.coordinates.latitude.to_string()),
            FormField::text("longitude", self.coordinates.longitude.to_string()),
        ];
        fields.extend(self.files.into_iter().map(|file| FormField {
            name: "files".to_string(),
            value: FormValue::File {
                file_name: file.file_name,
                mime: file.mime,
                bytes: file.bytes,
            },
        }));
        RequestBody::Multipart(fields)
    }
}

impl ApiClient {
    pub async fn list_chats(&self) -> ApiOutcome<Vec<ChatSummary>> {
        self.fetch(ApiRequest::get("chats").authenticated()).await
    }

    pub async fn get_chat(&self, id: &ChatId) -> ApiOutcome<Chat> {
        self.fetch(ApiRequest::get(format!("chats/{id}")).authenticated())
            .await
    }

    pub async fn create_chat(&self, submission: ChatSubmission) -> ApiOutcome<ChatReply> {
        tracing::info!(files = submission.files.len(), "creating chat");
        self.fetch(
            ApiRequest::new(Method::Post, "chats/")
                .authenticated()
                .body(submission.into_body()),
        )
        .await
    }

    pub async fn update_chat(&self, id: &ChatId, submission: ChatSubmission) -> ApiOutcome<ChatReply> {
        tracing::info!(chat = %id, files = submission.files.len(), "appending to chat");
        self.fetch(
            ApiRequest::new(Method::Patch, format!("chats/{id}/"))
                .authenticated()
                .body(submission.into_body()),
        )
        .await
    }

    pub async fn delete_chat(&self, id: &ChatId) -> ApiOutcome<()> {
        tracing::info!(chat = %id, "deleting chat");
        self.execute(
            ApiRequest::new(Method::Delete, format!("chats/{id}/"))
                .authenticated()
                .expect(204),
        )
        .await
    }

    pub async fn get_doctor(&self, id: &DoctorId) -> ApiOutcome<Doctor> {
        let locale = self.locale().as_str();
        self.fetch(ApiRequest::get(format!("api/{locale}/doctors/{id}")))
            .await
    }

    /// Fetch several doctors concurrently, returned in the order of `ids`.
    ///
    /// Ids the server does not know are skipped; any other failure fails the
    /// whole lookup.
    pub async fn get_doctors(&self, ids: &[DoctorId]) -> ApiResult<Vec<Doctor>> {
        let lookups = ids.iter().enumerate().map(|(index, id)| async move {
            (index, id, self.get_doctor(id).await)
        });
        let mut settled = join_all(lookups).await;
        settled.sort_by_key(|(index, _, _)| *index);

        let mut doctors = Vec::with_capacity(settled.len());
        for (_, id, outcome) in settled {
            match outcome.into_result()? {
                Some(doctor) => doctors.push(doctor),
                None => tracing::warn!(doctor = %id, "recommended doctor not found"),
            }
        }
        Ok(doctors)
    }
}
