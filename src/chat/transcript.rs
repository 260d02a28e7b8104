use crate::api::{ApiError, ApiOutcome};
use crate::types::Chat;

use super::EpochToken;

/// What a finished transcript load means for the page.
#[derive(Debug)]
pub enum TranscriptLoad {
    /// The route moved on while the request was in flight. Nothing may be applied.
    Stale,
    /// No chat selected.
    Empty,
    Loaded(Chat),
    /// The selected chat no longer exists.
    Gone,
    Failed(ApiError),
}

impl TranscriptLoad {
    /// Classify a load. `outcome` is `Ok(None)` when the route had no chat.
    ///
    /// The token is checked first, so a stale response never reaches the
    /// chat list, the toasts or the session.
    pub fn settle(token: &EpochToken, outcome: ApiOutcome<Option<Chat>>) -> Self {
        if !token.is_current() {
            return TranscriptLoad::Stale;
        }
        match outcome {
            ApiOutcome::Ok(None) => TranscriptLoad::Empty,
            ApiOutcome::Ok(Some(chat)) => TranscriptLoad::Loaded(chat),
            ApiOutcome::NotFound => TranscriptLoad::Gone,
            ApiOutcome::Failed(err) => TranscriptLoad::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::RequestEpoch;
    use crate::types::ChatId;

    fn chat(id: &str) -> Chat {
        Chat {
            id: ChatId::new(id),
            created_at: None,
            updated_at: None,
            messages: Vec::new(),
        }
    }

    #[test]
    fn current_token_passes_the_outcome_through() {
        let epoch = RequestEpoch::new();
        let token = epoch.begin();
        assert!(matches!(
            TranscriptLoad::settle(&token, ApiOutcome::Ok(Some(chat("a")))),
            TranscriptLoad::Loaded(c) if c.id.as_str() == "a"
        ));
        assert!(matches!(
            TranscriptLoad::settle(&token, ApiOutcome::Ok(None)),
            TranscriptLoad::Empty
        ));
        assert!(matches!(
            TranscriptLoad::settle(&token, ApiOutcome::NotFound),
            TranscriptLoad::Gone
        ));
    }

    #[test]
    fn superseded_load_is_stale_whatever_it_returned() {
        let epoch = RequestEpoch::new();
        let old = epoch.begin();
        let _newer = epoch.begin();
        for outcome in [
            ApiOutcome::Ok(Some(chat("a"))),
            ApiOutcome::Ok(None),
            ApiOutcome::NotFound,
            ApiOutcome::Failed(ApiError::Unauthorized),
        ] {
            assert!(matches!(
                TranscriptLoad::settle(&old, outcome),
                TranscriptLoad::Stale
            ));
        }
    }

    #[test]
    fn unmount_turns_a_failure_into_stale() {
        let epoch = RequestEpoch::new();
        let token = epoch.begin();
        epoch.invalidate();
        assert!(matches!(
            TranscriptLoad::settle(&token, ApiOutcome::Failed(ApiError::MissingToken)),
            TranscriptLoad::Stale
        ));
    }
}
