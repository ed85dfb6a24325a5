//! Draft and editing-session state for the form composer

use super::field::{
    Field, FormData, FormDefinition, MetadataChange, DEFAULT_BUTTON_TEXT, DEFAULT_TITLE,
};
use serde::Serialize;

/// Which kind of authoring is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    #[default]
    None,
    Create,
    Update,
}

impl SessionMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

/// The at-most-one field currently being authored.
///
/// A field is carried exactly when a session is open, so the mode and the
/// field can never disagree.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditSession {
    #[default]
    None,
    Creating(Field),
    Updating(Field),
}

impl EditSession {
    pub fn mode(&self) -> SessionMode {
        match self {
            EditSession::None => SessionMode::None,
            EditSession::Creating(_) => SessionMode::Create,
            EditSession::Updating(_) => SessionMode::Update,
        }
    }

    pub fn field(&self) -> Option<&Field> {
        match self {
            EditSession::None => None,
            EditSession::Creating(f) | EditSession::Updating(f) => Some(f),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, EditSession::None)
    }

    /// Close the session, returning what was open
    pub fn close(&mut self) -> EditSession {
        std::mem::take(self)
    }
}

/// The form being built: metadata plus the ordered field list
#[derive(Debug, Clone, PartialEq)]
pub struct FormDraft {
    pub title: String,
    pub description: String,
    pub button_text: String,
    pub number_of_pages: u32,
    pub fields: Vec<Field>,
    pub current_page: u32,
}

impl FormDraft {
    /// Build the initial draft.
    ///
    /// Metadata comes from the template when given, hard defaults otherwise.
    /// Fields come from the persisted document if one is supplied (even an
    /// empty one), then from the defaults, then nothing.
    pub fn new(
        form: Option<&FormDefinition>,
        persisted: Option<&FormData>,
        default_fields: Option<&[Field]>,
    ) -> Self {
        let form = form.cloned().unwrap_or_default();

        let fields = match (persisted, default_fields) {
            (Some(data), _) => data.fields.clone(),
            (None, Some(defaults)) => defaults.to_vec(),
            (None, None) => Vec::new(),
        };

        Self {
            title: form.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: form.description.unwrap_or_default(),
            button_text: form
                .button_text
                .unwrap_or_else(|| DEFAULT_BUTTON_TEXT.to_string()),
            number_of_pages: form.number_of_pages.filter(|n| *n >= 1).unwrap_or(1),
            fields,
            current_page: 1,
        }
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.position_of(id).is_some()
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    /// Overwrite the entry sharing `field.id`, keeping its position.
    /// Returns false when no entry matches.
    pub fn replace_in_place(&mut self, field: Field) -> bool {
        match self.position_of(&field.id) {
            Some(index) => {
                self.fields[index] = field;
                true
            }
            None => false,
        }
    }

    /// Remove the entry with `id`. Returns the removed field, if any.
    pub fn remove(&mut self, id: &str) -> Option<Field> {
        self.position_of(id).map(|index| self.fields.remove(index))
    }

    pub fn apply_metadata(&mut self, change: MetadataChange) {
        match change {
            MetadataChange::Title(title) => self.title = title,
            MetadataChange::Description(description) => self.description = description,
            MetadataChange::ButtonText(text) => self.button_text = text,
            MetadataChange::NumberOfPages(n) => self.number_of_pages = n.max(1),
        }
    }
}

impl Default for FormDraft {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

/// Snapshot of the draft handed to the host on every notified change
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDoc {
    pub fields: Vec<Field>,
    pub title: String,
    pub description: String,
    pub button_text: String,
    pub number_of_pages: u32,
    pub current_page: u32,
    #[serde(rename = "type")]
    pub form_type: String,
}

impl FormDoc {
    pub fn from_draft(draft: &FormDraft, form_type: &str) -> Self {
        Self {
            fields: draft.fields.clone(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            button_text: draft.button_text.clone(),
            number_of_pages: draft.number_of_pages,
            current_page: draft.current_page,
            form_type: form_type.to_string(),
        }
    }
}

/// What the single-field editor is given while a session is open
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldEditorView<'a> {
    pub mode: SessionMode,
    pub field: &'a Field,
    pub fields: &'a [Field],
    pub number_of_pages: u32,
}

/// What the preview / reorder surface is given
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewView<'a> {
    pub description: &'a str,
    pub fields: &'a [Field],
    pub current_page: u32,
}
