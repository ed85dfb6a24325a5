//! Host-facing seams of the composer, abstracted to enable mocking in tests

use crate::state::{FormData, FormDoc};
use anyhow::Result;

/// Receives everything the composer reports back to its host.
///
/// Both calls are fire-and-forget: the composer has already committed its
/// own state when they run, and an `Err` is logged and dropped.
#[cfg_attr(test, mockall::automock)]
pub trait ComposerObserver {
    /// The draft changed through a submit, a reorder or a metadata edit.
    /// Hosts that do not track changes return `Ok(())`.
    fn on_doc_change(&mut self, doc: &FormDoc) -> Result<()>;

    /// The host's readiness flag went from false to true
    fn save_form(&mut self, form: FormData) -> Result<()>;
}

/// Source of temporary ids for freshly created fields.
///
/// Ids must never collide with ids handed out by the persistence layer, and
/// repeated draws must eventually yield an id not yet in the draft.
#[cfg_attr(test, mockall::automock)]
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}
