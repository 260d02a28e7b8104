//! Integration tests for the DiagnoAI API client
//!
//! Every test drives the real `ApiClient` over an in-memory transport that
//! records requests and replays canned responses.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use time::macros::date;

use diagnoai::api::{
    ApiClient, ApiError, ApiOutcome, ApiResult, ChatSubmission, HttpRequest, Method, RawResponse,
    RequestBody, Transport,
};
use diagnoai::booking::{BookingBoard, BookingStatus, available_hours};
use diagnoai::chat::{
    ChatComposer, ChatDirectory, LocationError, LocationProvider, resolve_coordinates, submit_chat,
};
use diagnoai::config::ClientConfig;
use diagnoai::session::Session;
use diagnoai::types::{BookingId, ChatId, Coordinates, DoctorId};

const BASE: &str = "https://api.diagnoai.uz";

#[derive(Default)]
struct FakeTransport {
    routes: Mutex<HashMap<String, RawResponse>>,
    delays: Mutex<HashMap<String, Duration>>,
    sent: Mutex<Vec<HttpRequest>>,
    answered: Mutex<Vec<String>>,
}

fn route_key(method: Method, path: &str) -> String {
    format!("{} {BASE}/{path}", method.as_str())
}

impl FakeTransport {
    fn respond(&self, method: Method, path: &str, status: u16, body: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(route_key(method, path), RawResponse::new(status, body));
    }

    fn delay(&self, method: Method, path: &str, by: Duration) {
        self.delays.lock().unwrap().insert(route_key(method, path), by);
    }

    /// URLs in the order their responses were produced.
    fn answered(&self) -> Vec<String> {
        self.answered.lock().unwrap().clone()
    }

    fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> ApiResult<RawResponse> {
        let key = format!("{} {}", request.method.as_str(), request.url);
        let url = request.url.clone();
        self.sent.lock().unwrap().push(request);
        let delay = self.delays.lock().unwrap().get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.answered.lock().unwrap().push(url);
        Ok(self
            .routes
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| RawResponse::new(404, "")))
    }
}

fn client(session: Session) -> (ApiClient, Arc<FakeTransport>) {
    let transport = Arc::new(FakeTransport::default());
    let api = ApiClient::with_transport(transport.clone(), ClientConfig::default(), session);
    (api, transport)
}

fn signed_in() -> (ApiClient, Arc<FakeTransport>) {
    client(Session::with_token("tok-123"))
}

fn submission(text: &str) -> ChatSubmission {
    ChatSubmission {
        message: text.to_string(),
        files: Vec::new(),
        coordinates: Coordinates {
            latitude: 41.3,
            longitude: 69.2,
        },
    }
}

mod chat_tests {
    use super::*;

    #[tokio::test]
    async fn test_first_submission_creates_one_chat() {
        let (api, transport) = signed_in();
        transport.respond(Method::Post, "chats/", 201, r#"{"id": 42, "messages": []}"#);

        let route = submit_chat(&api, None, submission("headache and fever"))
            .await
            .expect("submission should succeed");

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].url, format!("{BASE}/chats/"));
        assert_eq!(sent[0].body.text_field("message"), Some("headache and fever"));
        assert!(sent[0].body.text_field("latitude").is_some());
        assert!(sent[0].body.text_field("longitude").is_some());
        assert_eq!(route.to_url(), "/ai-diagnosis?chatId=42");
    }

    #[tokio::test]
    async fn test_doctor_ids_are_added_to_the_redirect() {
        let (api, transport) = signed_in();
        transport.respond(
            Method::Post,
            "chats/",
            201,
            r#"{"id": "c9", "messages": [], "doctors": [3, 7]}"#,
        );

        let route = submit_chat(&api, None, submission("rash")).await.unwrap();
        assert_eq!(route.to_url(), "/ai-diagnosis?chatId=c9&doctorIds=3%2C7");
    }

    #[tokio::test]
    async fn test_existing_chat_is_updated_never_created() {
        let (api, transport) = signed_in();
        transport.respond(Method::Patch, "chats/42/", 200, r#"{"id": 42, "doctors": null}"#);

        let selected = ChatId::from("42");
        let route = submit_chat(&api, Some(&selected), submission("still coughing"))
            .await
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::Patch);
        assert_eq!(sent[0].url, format!("{BASE}/chats/42/"));
        assert_eq!(route.chat_id, Some(selected));
        assert!(route.doctor_ids.is_empty());
    }

    #[tokio::test]
    async fn test_missing_token_sends_nothing() {
        let (api, transport) = client(Session::anonymous());

        let err = submit_chat(&api, None, submission("headache")).await.unwrap_err();
        assert_eq!(err, ApiError::MissingToken);
        assert!(err.needs_sign_in());
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_bearer_token_is_attached() {
        let (api, transport) = signed_in();
        transport.respond(Method::Get, "chats", 200, "[]");

        assert_eq!(api.list_chats().await, ApiOutcome::Ok(Vec::new()));
        assert_eq!(transport.sent()[0].bearer.as_deref(), Some("tok-123"));
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_the_draft() {
        let (api, transport) = signed_in();
        transport.respond(Method::Post, "chats/", 500, "boom");

        let mut composer = ChatComposer::new();
        composer.set_text("fever".to_string());
        let draft = composer.begin_submit().expect("draft");
        assert!(composer.begin_submit().is_none());

        let result = submit_chat(&api, None, draft.with_coordinates(Coordinates::UNKNOWN)).await;
        assert!(matches!(result, Err(ApiError::Status { status: 500, .. })));
        composer.finish_failure();
        assert_eq!(composer.text(), "fever");
        assert!(composer.can_submit());
    }

    #[tokio::test]
    async fn test_delete_requires_no_content() {
        let (api, transport) = signed_in();
        transport.respond(Method::Delete, "chats/1/", 204, "");
        transport.respond(Method::Delete, "chats/2/", 200, "{}");

        assert_eq!(api.delete_chat(&ChatId::from("1")).await, ApiOutcome::Ok(()));
        assert_eq!(
            api.delete_chat(&ChatId::from("2")).await,
            ApiOutcome::Failed(ApiError::UnexpectedStatus {
                expected: 204,
                actual: 200
            })
        );
    }

    #[tokio::test]
    async fn test_deleting_an_unlisted_chat_is_a_no_op() {
        let (api, transport) = signed_in();
        transport.respond(Method::Delete, "chats/99/", 204, "");

        let mut directory = ChatDirectory::default();
        let id = ChatId::from("99");
        assert_eq!(api.delete_chat(&id).await, ApiOutcome::Ok(()));
        let removal = directory.remove(&id);
        assert!(!removal.removed);
        assert!(directory.chats().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_session_needs_sign_in() {
        let (api, transport) = signed_in();
        transport.respond(Method::Get, "chats", 401, "");

        match api.list_chats().await {
            ApiOutcome::Failed(err) => assert!(err.needs_sign_in()),
            other => panic!("expected failure, got {other:?}"),
        }
    }
}

mod location_tests {
    use super::*;

    struct DeniedLocation;

    #[async_trait]
    impl LocationProvider for DeniedLocation {
        async fn locate(&self) -> Result<Coordinates, LocationError> {
            Err(LocationError::Denied)
        }
    }

    #[tokio::test]
    async fn test_denied_location_still_submits_zero_coordinates() {
        let (api, transport) = signed_in();
        transport.respond(Method::Post, "chats/", 201, r#"{"id": 5}"#);

        let coordinates = resolve_coordinates(&DeniedLocation, Duration::from_millis(50)).await;
        let mut composer = ChatComposer::new();
        composer.set_text("dizzy".to_string());
        let draft = composer.begin_submit().unwrap();
        submit_chat(&api, None, draft.with_coordinates(coordinates))
            .await
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].body.text_field("latitude"), Some("0"));
        assert_eq!(sent[0].body.text_field("longitude"), Some("0"));
    }
}

mod doctor_tests {
    use super::*;

    #[tokio::test]
    async fn test_doctors_come_back_in_request_order() {
        let (api, transport) = client(Session::anonymous());
        transport.respond(Method::Get, "api/uz/doctors/7", 200, r#"{"id": 7, "name": "Karimova"}"#);
        transport.respond(Method::Get, "api/uz/doctors/3", 200, r#"{"id": 3, "name": "Aliyev"}"#);

        let ids = [DoctorId::from(7), DoctorId::from(404), DoctorId::from(3)];
        let doctors = api.get_doctors(&ids).await.unwrap();
        let names: Vec<&str> = doctors.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["Karimova", "Aliyev"]);
    }

    #[tokio::test]
    async fn test_slow_first_lookup_keeps_request_order() {
        let (api, transport) = client(Session::anonymous());
        transport.respond(Method::Get, "api/uz/doctors/1", 200, r#"{"id": 1, "name": "d1"}"#);
        transport.respond(Method::Get, "api/uz/doctors/2", 200, r#"{"id": 2, "name": "d2"}"#);
        transport.delay(Method::Get, "api/uz/doctors/1", Duration::from_millis(50));
        transport.delay(Method::Get, "api/uz/doctors/2", Duration::from_millis(1));

        let doctors = api
            .get_doctors(&[DoctorId::from(1), DoctorId::from(2)])
            .await
            .unwrap();

        assert_eq!(
            transport.answered(),
            [format!("{BASE}/api/uz/doctors/2"), format!("{BASE}/api/uz/doctors/1")]
        );
        let names: Vec<&str> = doctors.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["d1", "d2"]);
    }

    #[tokio::test]
    async fn test_doctor_lookup_fails_on_server_error() {
        let (api, transport) = client(Session::anonymous());
        transport.respond(Method::Get, "api/uz/doctors/1", 200, r#"{"id": 1}"#);
        transport.respond(Method::Get, "api/uz/doctors/2", 502, "bad gateway");

        let result = api.get_doctors(&[DoctorId::from(1), DoctorId::from(2)]).await;
        assert!(matches!(result, Err(ApiError::Status { status: 502, .. })));
    }
}

mod booking_tests {
    use super::*;

    #[tokio::test]
    async fn test_booked_times_leave_the_rest_of_the_day() {
        let (api, transport) = signed_in();
        transport.respond(
            Method::Get,
            "bookings/booked-times/?doctor_id=7&date=2024-05-01",
            200,
            r#"{"booked_times": ["09:00", "14:00"]}"#,
        );

        let taken = api
            .booked_times(&DoctorId::from(7), date!(2024 - 05 - 01))
            .await
            .ok()
            .expect("booked times");
        assert_eq!(
            available_hours(&taken),
            vec![8, 10, 11, 12, 13, 15, 16, 17, 18, 19, 20]
        );
    }

    #[tokio::test]
    async fn test_create_booking_posts_json() {
        let (api, transport) = signed_in();
        transport.respond(
            Method::Post,
            "bookings/",
            201,
            r#"{"id": 11, "doctor": 7, "appointment_date": "2024-05-01T10:00:00", "status": "pending"}"#,
        );

        let booking = api
            .create_booking(&DoctorId::from(7), "2024-05-01T10:00:00")
            .await
            .ok()
            .expect("created booking");
        assert_eq!(booking.status, BookingStatus::Pending);
        match &transport.sent()[0].body {
            RequestBody::Json(value) => {
                assert_eq!(value["doctor"], "7");
                assert_eq!(value["appointment_date"], "2024-05-01T10:00:00");
            }
            other => panic!("expected json body, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_confirming_a_pending_booking() {
        let (api, transport) = signed_in();
        transport.respond(
            Method::Get,
            "bookings/doctor/",
            200,
            r#"[{"id": 1, "doctor": 7, "appointment_date": "2024-05-01T09:00:00", "status": "pending"},
                {"id": 2, "doctor": 7, "appointment_date": "2024-05-01T11:00:00", "status": "approved"}]"#,
        );
        transport.respond(Method::Patch, "bookings/1/", 200, "{}");

        let mut board = BookingBoard::new(api.doctor_bookings().await.ok().unwrap());
        let id = BookingId::from(1);
        let before = board.get(&id).cloned().unwrap();

        board.check_transition(&id, BookingStatus::Confirmed).unwrap();
        assert!(api.update_booking_status(&id, BookingStatus::Confirmed).await.is_ok());
        board.apply_status(&id, BookingStatus::Confirmed).unwrap();

        let sent = transport.sent();
        let patch = sent.last().unwrap();
        assert_eq!(patch.method, Method::Patch);
        match &patch.body {
            RequestBody::Json(value) => assert_eq!(value["status"], "confirmed"),
            other => panic!("expected json body, got {other:?}"),
        }

        let after = board.get(&id).unwrap();
        assert_eq!(after.status, BookingStatus::Confirmed);
        assert_eq!(after.appointment_date, before.appointment_date);
        assert_eq!(after.doctor, before.doctor);
        assert_eq!(board.get(&BookingId::from(2)).unwrap().status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_doctor_panel_forbidden_for_patients_keeps_session() {
        let (api, transport) = client(Session::with_token("patient"));
        transport.respond(Method::Get, "bookings/doctor/", 403, r#"{"detail": "not a doctor"}"#);

        match api.doctor_bookings().await {
            ApiOutcome::Failed(err) => {
                assert_eq!(err, ApiError::Forbidden);
                assert!(!err.needs_sign_in());
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(api.session().token().as_deref(), Some("patient"));
    }

    #[tokio::test]
    async fn test_delete_booking_expects_no_content() {
        let (api, transport) = signed_in();
        transport.respond(Method::Delete, "bookings/4/", 204, "");

        assert_eq!(api.delete_booking(&BookingId::from(4)).await, ApiOutcome::Ok(()));
        assert_eq!(api.delete_booking(&BookingId::from(5)).await, ApiOutcome::NotFound);
    }
}
