//! Form domain layer
//!
//! Value objects for fields and form documents, plus the draft and
//! editing-session state the composer mutates.

mod field;
mod form_state;

pub use field::{Field, FormData, FormDefinition, MetadataChange};
pub use form_state::{EditSession, FieldEditorView, FormDoc, FormDraft, PreviewView, SessionMode};
