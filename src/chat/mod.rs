//! Client side of the AI-diagnosis chat: composing a submission, sending it,
//! and keeping the page state (selection, route, stale responses) straight.

mod composer;
mod directory;
mod epoch;
mod location;
mod route;
mod transcript;
mod typewriter;

pub use composer::{ChatComposer, ComposerState, SubmissionDraft, submit_chat};
pub use directory::{ChatDirectory, Removal};
pub use epoch::{EpochToken, RequestEpoch};
pub use location::{
    ConfiguredLocation, LocationError, LocationProvider, UnavailableLocation, resolve_coordinates,
};
pub use route::{DIAGNOSIS_PATH, DiagnosisRoute};
pub use transcript::TranscriptLoad;
pub use typewriter::{TYPEWRITER_STEP, TYPEWRITER_TICK, Typewriter};
