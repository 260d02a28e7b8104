//! Booking helpers: the daily time-slot grid and the booking status model.

mod slots;
mod status;

pub use slots::{
    CLOSING_HOUR, OPENING_HOUR, appointment_timestamp, available_hours, bookable_hours,
    day_hours, format_date, parse_date, parse_hour, slot_label,
};
pub use status::{BoardError, BookingBoard, BookingStatus};
