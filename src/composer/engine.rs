//! The composition engine: one draft, one editing session, one host

use super::ids::TempIdGenerator;
use super::traits::{ComposerObserver, IdGenerator};
use crate::state::{
    EditSession, Field, FieldEditorView, FormData, FormDefinition, FormDoc, FormDraft,
    MetadataChange, PreviewView, SessionMode,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Draws allowed before a generator that only returns taken ids is rejected
const MAX_ID_DRAWS: usize = 16;

/// Everything the host hands over when the composer is first mounted
#[derive(Debug, Clone, Default)]
pub struct ComposerProps {
    /// Existing form template (load path)
    pub form: Option<FormDefinition>,
    /// Default field list (fresh-authoring path)
    pub fields: Option<Vec<Field>>,
    /// Categorical form type, copied into synthesized save payloads
    pub form_type: String,
    /// Display hint for the host; the composer only stores it
    pub hide_optional_fields: bool,
    pub is_ready_to_save: bool,
    /// Persisted document; compared by reference, never by content
    pub form_data: Option<Arc<FormData>>,
}

/// The props the host may change after mount
#[derive(Debug, Clone, Default)]
pub struct HostUpdate {
    pub is_ready_to_save: bool,
    pub form_data: Option<Arc<FormData>>,
}

/// Owns the draft and the editing session and serializes every change to
/// them through its commands.
pub struct Composer<O, G = TempIdGenerator> {
    draft: FormDraft,
    session: EditSession,
    form_type: String,
    hide_optional_fields: bool,
    last_ready: bool,
    last_form_data: Option<Arc<FormData>>,
    observer: O,
    ids: G,
}

impl<O: ComposerObserver> Composer<O, TempIdGenerator> {
    pub fn new(props: ComposerProps, observer: O) -> Self {
        Self::with_id_generator(props, observer, TempIdGenerator)
    }
}

impl<O: ComposerObserver, G: IdGenerator> Composer<O, G> {
    pub fn with_id_generator(props: ComposerProps, observer: O, ids: G) -> Self {
        let draft = FormDraft::new(
            props.form.as_ref(),
            props.form_data.as_deref(),
            props.fields.as_deref(),
        );
        debug!(
            fields = draft.fields.len(),
            form_type = %props.form_type,
            "composer mounted"
        );

        Self {
            draft,
            session: EditSession::None,
            form_type: props.form_type,
            hide_optional_fields: props.hide_optional_fields,
            // A flag that is already set at mount is not an edge
            last_ready: props.is_ready_to_save,
            last_form_data: props.form_data,
            observer,
            ids,
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.draft.fields
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn mode(&self) -> SessionMode {
        self.session.mode()
    }

    pub fn hide_optional_fields(&self) -> bool {
        self.hide_optional_fields
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Snapshot handed to the host on change
    pub fn doc(&self) -> FormDoc {
        FormDoc::from_draft(&self.draft, &self.form_type)
    }

    /// Editor inputs, present only while a session is open
    pub fn editor(&self) -> Option<FieldEditorView<'_>> {
        self.session.field().map(|field| FieldEditorView {
            mode: self.session.mode(),
            field,
            fields: &self.draft.fields,
            number_of_pages: self.draft.number_of_pages,
        })
    }

    pub fn preview(&self) -> PreviewView<'_> {
        PreviewView {
            description: &self.draft.description,
            fields: &self.draft.fields,
            current_page: self.draft.current_page,
        }
    }

    /// Apply a host props update: persisted-document replacement first, then
    /// the readiness edge.
    pub fn receive_host_update(&mut self, update: HostUpdate) {
        if let Some(next) = update.form_data.as_ref() {
            let is_new_reference = self
                .last_form_data
                .as_ref()
                .map_or(true, |prev| !Arc::ptr_eq(prev, next));

            if is_new_reference {
                info!(
                    fields = next.fields.len(),
                    "replacing fields from persisted form"
                );
                self.draft.fields = next.fields.clone();
            }
        }

        let rising_edge = update.is_ready_to_save && !self.last_ready;
        self.last_ready = update.is_ready_to_save;
        self.last_form_data = update.form_data;

        if rising_edge {
            let payload = match self.last_form_data.as_deref() {
                Some(persisted) => persisted.clone(),
                None => self.synthesize_save_payload(),
            };
            info!(fields = payload.fields.len(), "host ready, saving form");
            if let Err(err) = self.observer.save_form(payload) {
                warn!("host save handler failed: {err:#}");
            }
        }
    }

    fn synthesize_save_payload(&self) -> FormData {
        FormData {
            title: self.draft.title.clone(),
            description: self.draft.description.clone(),
            button_text: self.draft.button_text.clone(),
            fields: self.draft.fields.clone(),
            form_type: self.form_type.clone(),
            number_of_pages: None,
        }
    }

    /// Open a creating session for a palette choice, discarding any open one
    pub fn select_field_type(&mut self, field_type: &str) {
        let mut draws = 0;
        let id = loop {
            let candidate = self.ids.next_id();
            if !self.draft.contains_id(&candidate) {
                break candidate;
            }
            draws += 1;
            debug_assert!(
                draws < MAX_ID_DRAWS,
                "id generator keeps returning ids already in use"
            );
            if draws >= MAX_ID_DRAWS {
                error!(draws, "no unused id generated, field not created");
                return;
            }
            warn!(id = %candidate, "generated id already in use, drawing another");
        };

        self.discard_open_session();
        debug!(%id, field_type, "creating field");
        self.session = EditSession::Creating(Field::stub(id, field_type));
    }

    /// Open an updating session on an existing field, discarding any open one
    pub fn select_field(&mut self, field: Field) {
        self.discard_open_session();
        debug!(id = %field.id, "updating field");
        self.session = EditSession::Updating(field);
    }

    fn discard_open_session(&mut self) {
        if let Some(field) = self.session.field() {
            debug!(
                id = %field.id,
                mode = self.session.mode().label(),
                "discarding unsaved field edits"
            );
        }
    }

    /// Merge an authored field back into the draft and close the session
    pub fn submit_field(&mut self, field: Field) {
        match self.session.close() {
            EditSession::None => {
                debug!(id = %field.id, "submit without an open session ignored");
                return;
            }
            EditSession::Creating(_) => {
                let duplicate = self.draft.contains_id(&field.id);
                debug_assert!(!duplicate, "created field id {} already exists", field.id);
                if duplicate {
                    error!(id = %field.id, "created field id already exists, dropping field");
                } else {
                    debug!(id = %field.id, "appending field");
                    self.draft.fields.push(field);
                }
            }
            EditSession::Updating(_) => {
                let id = field.id.clone();
                if self.draft.replace_in_place(field) {
                    debug!(%id, "field updated in place");
                } else {
                    debug!(%id, "updated field no longer in draft, dropping");
                }
            }
        }

        self.notify_doc_change();
    }

    /// Remove a field. Always closes the session; does not notify the host.
    pub fn delete_field(&mut self, id: &str) {
        match self.draft.remove(id) {
            Some(_) => debug!(id, "field deleted"),
            None => debug!(id, "delete of unknown field ignored"),
        }
        self.session.close();
    }

    pub fn cancel_edit(&mut self) {
        if !self.session.is_open() {
            return;
        }
        if let Some(field) = self.session.close().field() {
            debug!(id = %field.id, "field edit cancelled");
        }
    }

    /// Overwrite each listed field's content at its current position.
    ///
    /// Entries never move; ordering lives inside the field payload.
    pub fn change_fields_order(&mut self, fields: Vec<Field>) {
        for field in fields {
            let id = field.id.clone();
            if !self.draft.replace_in_place(field) {
                debug!(%id, "reordered field not in draft, ignoring");
            }
        }

        self.notify_doc_change();
    }

    /// Edit the form's title, description, button text or page count
    pub fn change_metadata(&mut self, change: MetadataChange) {
        debug!(?change, "form metadata changed");
        self.draft.apply_metadata(change);
        self.notify_doc_change();
    }

    fn notify_doc_change(&mut self) {
        let doc = self.doc();
        if let Err(err) = self.observer.on_doc_change(&doc) {
            warn!("host change handler failed: {err:#}");
        }
    }
}
