pub mod booking;
pub mod bookings;
pub mod chat;
pub mod diagnosis;
pub mod doctors;
pub mod hospitals;
pub mod shared;

pub use booking::{BookingDialog, TimeSlotGrid};
pub use bookings::BookingsView;
pub use chat::{ChatForm, MessageList};
pub use diagnosis::DiagnosisView;
pub use doctors::{DoctorCard, DoctorSidebar, DoctorsView};
pub use hospitals::HospitalsView;
