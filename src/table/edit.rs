//! Single-record edit session.
//!
//! The session is a small state machine: `Closed`, `Editing` and `Saving`.
//! `begin_save`/`finish_save` split a submit around the remote call so a
//! second submit arriving while the first is in flight is rejected instead of
//! firing another update.

use std::mem;

use crate::error::{TableError, TableResult};
use crate::models::{DraftUpdate, Service, ServiceDraft, ServiceId};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditSession {
    #[default]
    Closed,
    Editing {
        record: Service,
        draft: ServiceDraft,
    },
    Saving {
        record: Service,
        draft: ServiceDraft,
    },
}

/// Payload for the update call issued by a submit.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub id: ServiceId,
    pub draft: ServiceDraft,
}

impl EditSession {
    /// Start editing `record`, replacing any open session and its draft.
    pub fn open(&mut self, record: Service) {
        let draft = ServiceDraft::from_service(&record);
        *self = EditSession::Editing { record, draft };
    }

    /// Merge one field change into the draft. Ignored unless `Editing`.
    pub fn update(&mut self, update: DraftUpdate) -> bool {
        match self {
            EditSession::Editing { draft, .. } => {
                draft.apply(update);
                true
            }
            _ => false,
        }
    }

    /// Move `Editing` to `Saving` and hand back the request to send.
    pub fn begin_save(&mut self) -> TableResult<SaveRequest> {
        match mem::take(self) {
            EditSession::Editing { record, draft } => {
                let request = SaveRequest {
                    id: record.id.clone(),
                    draft: draft.clone(),
                };
                *self = EditSession::Saving { record, draft };
                Ok(request)
            }
            saving @ EditSession::Saving { .. } => {
                *self = saving;
                Err(TableError::SessionBusy)
            }
            EditSession::Closed => Err(TableError::NoSession),
        }
    }

    /// Settle a save: success closes the session, failure returns to
    /// `Editing` with the draft intact.
    pub fn finish_save(&mut self, succeeded: bool) {
        match mem::take(self) {
            EditSession::Saving { record, draft } if !succeeded => {
                *self = EditSession::Editing { record, draft };
            }
            EditSession::Saving { .. } => {}
            other => *self = other,
        }
    }

    /// Discard the draft. Always ends `Closed`.
    pub fn cancel(&mut self) {
        *self = EditSession::Closed;
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, EditSession::Closed)
    }

    pub fn is_saving(&self) -> bool {
        matches!(self, EditSession::Saving { .. })
    }

    pub fn record(&self) -> Option<&Service> {
        match self {
            EditSession::Editing { record, .. } | EditSession::Saving { record, .. } => {
                Some(record)
            }
            EditSession::Closed => None,
        }
    }

    pub fn draft(&self) -> Option<&ServiceDraft> {
        match self {
            EditSession::Editing { draft, .. } | EditSession::Saving { draft, .. } => Some(draft),
            EditSession::Closed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn haircut() -> Service {
        Service::new(1, "Haircut", Some(30.0))
    }

    #[test]
    fn open_seeds_draft_from_record() {
        let mut session = EditSession::default();
        session.open(haircut());

        let draft = session.draft().unwrap();
        assert_eq!(draft.name, "Haircut");
        assert_eq!(draft.price, Some(30.0));
    }

    #[test]
    fn second_submit_while_saving_is_rejected() {
        let mut session = EditSession::default();
        session.open(haircut());

        let request = session.begin_save().unwrap();
        assert_eq!(request.id, ServiceId::from(1));
        assert!(session.is_saving());
        assert!(matches!(session.begin_save(), Err(TableError::SessionBusy)));
        assert!(session.is_saving());
    }

    #[test]
    fn failed_save_returns_to_editing_with_draft() {
        let mut session = EditSession::default();
        session.open(haircut());
        session.update(DraftUpdate::Name("Buzz cut".into()));

        session.begin_save().unwrap();
        session.finish_save(false);

        assert!(matches!(session, EditSession::Editing { .. }));
        assert_eq!(session.draft().unwrap().name, "Buzz cut");
    }

    #[test]
    fn successful_save_closes() {
        let mut session = EditSession::default();
        session.open(haircut());
        session.begin_save().unwrap();
        session.finish_save(true);
        assert_eq!(session, EditSession::Closed);
    }

    #[test]
    fn closed_session_has_nothing_to_save() {
        let mut session = EditSession::default();
        assert!(matches!(session.begin_save(), Err(TableError::NoSession)));
        assert!(!session.update(DraftUpdate::Price(None)));
    }

    #[test]
    fn reopening_discards_previous_draft() {
        let mut session = EditSession::default();
        session.open(haircut());
        session.update(DraftUpdate::Name("unsaved".into()));

        session.open(Service::new(2, "Coloring", None));
        assert_eq!(session.record().unwrap().id, ServiceId::from(2));
        assert_eq!(session.draft().unwrap().name, "Coloring");
    }
}
