//! REST client for the DiagnoAI backend.
//!
//! - `transport` - the one place bytes go over the wire (`reqwest`), behind a trait
//! - `client` - token attachment, URL building and status classification
//! - `chats`, `directory`, `bookings` - typed endpoint wrappers
//!
//! Every call returns an [`ApiOutcome`], so absence and failure are told
//! apart the same way everywhere.

mod bookings;
mod chats;
mod client;
mod directory;
mod error;
mod transport;

pub use chats::ChatSubmission;
pub use client::{ApiClient, ApiRequest, Auth};
pub use error::{ApiError, ApiOutcome, ApiResult};
pub use transport::{
    FormField, FormValue, HttpRequest, HttpTransport, Method, RawResponse, RequestBody, Transport,
};
