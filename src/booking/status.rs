use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::types::{Booking, BookingId};

/// Lifecycle of a booking.
///
/// The backend has been seen emitting `approved`, `canceled` and `rejected`;
/// those read as `Confirmed` and `Cancelled`. Only the canonical names are
/// ever written back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" | "approved" => Some(BookingStatus::Confirmed),
            "cancelled" | "canceled" | "rejected" => Some(BookingStatus::Cancelled),
            "completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }

    pub fn is_final(self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }

    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Completed)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }

    /// Statuses an operator may move a booking to from here.
    pub fn next_steps(self) -> &'static [BookingStatus] {
        match self {
            BookingStatus::Pending => &[BookingStatus::Confirmed, BookingStatus::Cancelled],
            BookingStatus::Confirmed => &[BookingStatus::Completed, BookingStatus::Cancelled],
            BookingStatus::Cancelled | BookingStatus::Completed => &[],
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BookingStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        BookingStatus::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown booking status: {raw}")))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoardError {
    #[error("No booking with id {0}")]
    UnknownBooking(BookingId),

    #[error("Cannot move a {from} booking to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
}

/// Local view of the bookings listed in the doctor panel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BookingBoard {
    bookings: Vec<Booking>,
}

impl BookingBoard {
    pub fn new(bookings: Vec<Booking>) -> Self {
        Self { bookings }
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn get(&self, id: &BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|b| &b.id == id)
    }

    /// Check a transition before the request goes out.
    pub fn check_transition(&self, id: &BookingId, next: BookingStatus) -> Result<(), BoardError> {
        let booking = self
            .get(id)
            .ok_or_else(|| BoardError::UnknownBooking(id.clone()))?;
        if booking.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(BoardError::InvalidTransition {
                from: booking.status,
                to: next,
            })
        }
    }

    /// Record a status the server accepted. Only `status` changes.
    pub fn apply_status(&mut self, id: &BookingId, status: BookingStatus) -> Result<(), BoardError> {
        let booking = self
            .bookings
            .iter_mut()
            .find(|b| &b.id == id)
            .ok_or_else(|| BoardError::UnknownBooking(id.clone()))?;
        booking.status = status;
        Ok(())
    }

    pub fn remove(&mut self, id: &BookingId) -> bool {
        let before = self.bookings.len();
        self.bookings.retain(|b| &b.id != id);
        self.bookings.len() != before
    }
}
