use tracing::{info, warn};

use super::{LoadTicket, VersionClock};
use crate::core::auth::{AdminGate, GateState};
use crate::core::catalog::models::{WebsiteEntry, WebsiteFields};
use crate::core::catalog::CatalogError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    New,
    Existing(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    Editing {
        target: EditTarget,
        draft: WebsiteFields,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One-shot message shown on the next render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// State of one admin session: gate, edit form and the last loaded list.
#[derive(Debug, Clone, Default)]
pub struct AdminView {
    gate: GateState,
    form: FormState,
    entries: Vec<WebsiteEntry>,
    load_error: Option<String>,
    clock: VersionClock,
    notice: Option<Notice>,
}

impl AdminView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self) -> bool {
        self.gate == GateState::Unlocked
    }

    pub fn login(&mut self, gate: &AdminGate, password: &str) -> bool {
        if gate.authenticate(password) {
            self.gate = GateState::Unlocked;
            info!("admin view unlocked");
            true
        } else {
            warn!("rejected admin password");
            self.notice = Some(Notice::error("Incorrect password!"));
            false
        }
    }

    pub fn logout(&mut self) {
        *self = Self::default();
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn entries(&self) -> &[WebsiteEntry] {
        &self.entries
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Opens an empty form, replacing any edit in progress.
    pub fn start_add(&mut self) -> bool {
        if !self.is_unlocked() {
            return false;
        }
        self.form = FormState::Editing {
            target: EditTarget::New,
            draft: WebsiteFields::default(),
        };
        true
    }

    /// Opens the form on a loaded entry, replacing any edit in progress.
    pub fn start_edit(&mut self, id: &str) -> bool {
        if !self.is_unlocked() {
            return false;
        }
        let Some(entry) = self.entries.iter().find(|entry| entry.id == id) else {
            return false;
        };
        self.form = FormState::Editing {
            target: EditTarget::Existing(entry.id.clone()),
            draft: entry.fields.clone(),
        };
        true
    }

    pub fn cancel_edit(&mut self) {
        self.form = FormState::Idle;
    }

    /// Replaces the draft with the submitted form values.
    pub fn set_draft(&mut self, fields: WebsiteFields) -> bool {
        match &mut self.form {
            FormState::Editing { draft, .. } => {
                *draft = fields;
                true
            }
            FormState::Idle => false,
        }
    }

    pub fn pending_submission(&self) -> Option<(EditTarget, WebsiteFields)> {
        if !self.is_unlocked() {
            return None;
        }
        match &self.form {
            FormState::Editing { target, draft } => Some((target.clone(), draft.clone())),
            FormState::Idle => None,
        }
    }

    /// Records a create/update outcome. A failure keeps the form open with
    /// the user's input.
    pub fn finish_submit(&mut self, target: &EditTarget, result: Result<(), CatalogError>) -> bool {
        match result {
            Ok(()) => {
                let message = match target {
                    EditTarget::New => "Website added successfully!",
                    EditTarget::Existing(_) => "Website updated successfully!",
                };
                self.notice = Some(Notice::success(message));
                self.form = FormState::Idle;
                true
            }
            Err(CatalogError::Validation(error)) => {
                self.notice = Some(Notice::error(format!("Please fill in the form: {error}")));
                false
            }
            Err(error) => {
                warn!(%error, "error saving website");
                self.notice = Some(Notice::error("Error saving website"));
                false
            }
        }
    }

    pub fn finish_delete(&mut self, result: Result<(), CatalogError>) -> bool {
        match result {
            Ok(()) => {
                self.notice = Some(Notice::success("Website deleted successfully!"));
                true
            }
            Err(error) => {
                warn!(%error, "error deleting website");
                self.notice = Some(Notice::error("Error deleting website"));
                false
            }
        }
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.clock.begin()
    }

    /// Applies a list refresh unless a newer one has started. The previous
    /// list stays visible when the refresh fails.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<WebsiteEntry>, CatalogError>,
    ) -> bool {
        if !self.clock.is_current(ticket) {
            return false;
        }
        match result {
            Ok(entries) => {
                self.entries = entries;
                self.load_error = None;
            }
            Err(error) => {
                warn!(%error, "error fetching websites");
                self.load_error = Some(error.to_string());
            }
        }
        true
    }
}
