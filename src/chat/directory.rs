use crate::types::{ChatId, ChatSummary};

use super::route::DiagnosisRoute;

/// Past chats and the current selection on the diagnosis page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatDirectory {
    chats: Vec<ChatSummary>,
    selected: Option<ChatId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Removal {
    pub removed: bool,
    /// The deleted chat was the open one; the page should start a new chat.
    pub cleared_selection: bool,
}

impl ChatDirectory {
    pub fn new(chats: Vec<ChatSummary>) -> Self {
        Self {
            chats,
            selected: None,
        }
    }

    pub fn chats(&self) -> &[ChatSummary] {
        &self.chats
    }

    pub fn selected(&self) -> Option<&ChatId> {
        self.selected.as_ref()
    }

    pub fn replace(&mut self, chats: Vec<ChatSummary>) {
        self.chats = chats;
    }

    pub fn select(&mut self, id: Option<ChatId>) {
        self.selected = id;
    }

    /// Make sure a freshly created chat shows up in the list.
    pub fn remember(&mut self, id: &ChatId) {
        if !self.chats.iter().any(|c| &c.id == id) {
            self.chats.insert(
                0,
                ChatSummary {
                    id: id.clone(),
                    title: None,
                    created_at: None,
                },
            );
        }
    }

    pub fn new_chat(&mut self) -> DiagnosisRoute {
        self.selected = None;
        DiagnosisRoute::base()
    }

    /// Drop `id` from the list. Unknown ids leave everything as it was.
    pub fn remove(&mut self, id: &ChatId) -> Removal {
        let before = self.chats.len();
        self.chats.retain(|c| &c.id != id);
        let cleared_selection = self.selected.as_ref() == Some(id);
        if cleared_selection {
            self.selected = None;
        }
        Removal {
            removed: self.chats.len() != before,
            cleared_selection,
        }
    }
}
