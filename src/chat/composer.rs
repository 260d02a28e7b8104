use crate::api::{ApiClient, ApiResult, ChatSubmission};
use crate::types::{Attachment, ChatId, Coordinates};

use super::route::DiagnosisRoute;

/// Input captured at submit time, waiting for a position.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmissionDraft {
    pub message: String,
    pub files: Vec<Attachment>,
}

impl SubmissionDraft {
    pub fn with_coordinates(self, coordinates: Coordinates) -> ChatSubmission {
        ChatSubmission {
            message: self.message,
            files: self.files,
            coordinates,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ComposerState {
    #[default]
    Idle,
    Collecting,
    Submitting,
}

/// Symptom input for one diagnosis page: text, attachments and the
/// single-submission guard.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatComposer {
    text: String,
    files: Vec<Attachment>,
    state: ComposerState,
}

impl ChatComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ComposerState {
        self.state
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn files(&self) -> &[Attachment] {
        &self.files
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.refresh_state();
    }

    pub fn attach(&mut self, file: Attachment) {
        self.files.push(file);
        self.refresh_state();
    }

    pub fn detach(&mut self, index: usize) {
        if index < self.files.len() {
            self.files.remove(index);
        }
        self.refresh_state();
    }

    pub fn is_submitting(&self) -> bool {
        self.state == ComposerState::Submitting
    }

    /// Something to send and nothing already in flight.
    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && (!self.text.trim().is_empty() || !self.files.is_empty())
    }

    /// Snapshot the input and enter `Submitting`. `None` if not allowed.
    ///
    /// The guard is taken here, before the location lookup, so a second
    /// click while the position resolves is refused.
    pub fn begin_submit(&mut self) -> Option<SubmissionDraft> {
        if !self.can_submit() {
            return None;
        }
        self.state = ComposerState::Submitting;
        Some(SubmissionDraft {
            message: self.text.trim().to_string(),
            files: self.files.clone(),
        })
    }

    pub fn finish_success(&mut self) {
        self.text.clear();
        self.files.clear();
        self.state = ComposerState::Idle;
    }

    /// Input is kept so the user can retry.
    pub fn finish_failure(&mut self) {
        self.state = ComposerState::Idle;
        self.refresh_state();
    }

    fn refresh_state(&mut self) {
        if self.is_submitting() {
            return;
        }
        self.state = if self.text.is_empty() && self.files.is_empty() {
            ComposerState::Idle
        } else {
            ComposerState::Collecting
        };
    }
}

/// Send one submission: create a chat when nothing is selected, otherwise
/// append to the selected one. Returns where the page should go next.
pub async fn submit_chat(
    api: &ApiClient,
    selected: Option<&ChatId>,
    submission: ChatSubmission,
) -> ApiResult<DiagnosisRoute> {
    let outcome = match selected {
        Some(id) => api.update_chat(id, submission).await,
        None => api.create_chat(submission).await,
    };
    let reply = outcome.require()?;
    tracing::info!(
        chat = %reply.id,
        doctors = reply.doctors.len(),
        "chat submission accepted"
    );
    Ok(DiagnosisRoute::for_chat(reply.id, reply.doctors))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> Attachment {
        Attachment {
            file_name: "x.pdf".into(),
            mime: "application/pdf".into(),
            bytes: vec![0],
        }
    }

    #[test]
    fn blank_input_cannot_submit() {
        let mut composer = ChatComposer::new();
        assert!(!composer.can_submit());
        composer.set_text("   ");
        assert!(!composer.can_submit());
        assert_eq!(composer.begin_submit(), None);
    }

    #[test]
    fn files_alone_are_enough() {
        let mut composer = ChatComposer::new();
        composer.attach(file());
        assert_eq!(composer.state(), ComposerState::Collecting);
        let submission = composer
            .begin_submit()
            .unwrap()
            .with_coordinates(Coordinates::UNKNOWN);
        assert_eq!(submission.message, "");
        assert_eq!(submission.coordinates, Coordinates::UNKNOWN);
        assert_eq!(submission.files.len(), 1);
    }

    #[test]
    fn only_one_submission_in_flight() {
        let mut composer = ChatComposer::new();
        composer.set_text("headache and fever");
        assert!(composer.begin_submit().is_some());
        assert_eq!(composer.state(), ComposerState::Submitting);
        assert!(!composer.can_submit());
        assert!(composer.begin_submit().is_none());
        composer.set_text("more");
        assert_eq!(composer.state(), ComposerState::Submitting);
    }

    #[test]
    fn success_clears_failure_keeps() {
        let mut composer = ChatComposer::new();
        composer.set_text("cough");
        composer.attach(file());
        composer.begin_submit();
        composer.finish_failure();
        assert_eq!(composer.state(), ComposerState::Collecting);
        assert_eq!(composer.text(), "cough");
        assert_eq!(composer.files().len(), 1);

        composer.begin_submit();
        composer.finish_success();
        assert_eq!(composer.state(), ComposerState::Idle);
        assert!(composer.text().is_empty());
        assert!(composer.files().is_empty());
    }

    #[test]
    fn detach_out_of_range_is_ignored() {
        let mut composer = ChatComposer::new();
        composer.attach(file());
        composer.detach(5);
        assert_eq!(composer.files().len(), 1);
        composer.detach(0);
        assert_eq!(composer.state(), ComposerState::Idle);
    }
}
