use serde::Deserialize;
use serde_json::json;
use time::Date;

use super::client::{ApiClient, ApiRequest};
use super::error::ApiOutcome;
use super::transport::{Method, RequestBody};
use crate::booking::{BookingStatus, format_date};
use crate::types::{Booking, BookingId, DoctorId};

#[derive(Deserialize)]
struct BookedTimes {
    #[serde(default)]
    booked_times: Vec<String>,
}

impl ApiClient {
    /// Hours already taken for `doctor` on `date`, as the server reports them.
    pub async fn booked_times(&self, doctor: &DoctorId, date: Date) -> ApiOutcome<Vec<String>> {
        self.fetch::<BookedTimes>(
            ApiRequest::get("bookings/booked-times/")
                .authenticated()
                .query("doctor_id", doctor.as_str())
                .query("date", format_date(date)),
        )
        .await
        .map(|times| times.booked_times)
    }

    pub async fn create_booking(&self, doctor: &DoctorId, appointment_date: &str) -> ApiOutcome<Booking> {
        tracing::info!(doctor = %doctor, %appointment_date, "creating booking");
        self.fetch(
            ApiRequest::new(Method::Post, "bookings/")
                .authenticated()
                .body(RequestBody::Json(json!({
                    "doctor": doctor,
                    "appointment_date": appointment_date,
                }))),
        )
        .await
    }

    /// Bookings made by the signed-in patient.
    pub async fn my_bookings(&self) -> ApiOutcome<Vec<Booking>> {
        self.fetch(ApiRequest::get("bookings/").authenticated())
            .await
    }

    /// Bookings addressed to the signed-in doctor.
    pub async fn doctor_bookings(&self) -> ApiOutcome<Vec<Booking>> {
        self.fetch(ApiRequest::get("bookings/doctor/").authenticated())
            .await
    }

    pub async fn update_booking_status(&self, id: &BookingId, status: BookingStatus) -> ApiOutcome<()> {
        tracing::info!(booking = %id, status = status.as_str(), "updating booking status");
        self.execute(
            ApiRequest::new(Method::Patch, format!("bookings/{id}/"))
                .authenticated()
                .body(RequestBody::Json(json!({ "status": status }))),
        )
        .await
    }

    pub async fn delete_booking(&self, id: &BookingId) -> ApiOutcome<()> {
        tracing::info!(booking = %id, "deleting booking");
        self.execute(
            ApiRequest::new(Method::Delete, format!("bookings/{id}/"))
                .authenticated()
                .expect(204),
        )
        .await
    }
}
