//! Replay host: drives a [`Composer`] from a JSON script
//!
//! A script carries the props a host would mount the composer with, then a
//! list of commands. Everything the composer reports back is recorded as an
//! [`Emitted`] event, in order.

use crate::composer::{Composer, ComposerObserver, ComposerProps, HostUpdate, TempIdGenerator};
use crate::config::ComposerConfig;
use crate::state::{Field, FormData, FormDefinition, FormDoc, MetadataChange, SessionMode};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("invalid script JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown persisted form reference: {0}")]
    UnknownReference(String),
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
}

/// Names a persisted document so a script can express reference identity.
///
/// With `data`, a new reference is minted under `name`. Without it, the
/// reference last minted under `name` is reused as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct PersistedRef {
    #[serde(rename = "ref")]
    pub name: String,
    pub data: Option<FormData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptProps {
    pub form: Option<FormDefinition>,
    pub fields: Option<Vec<Field>>,
    #[serde(rename = "type")]
    pub form_type: Option<String>,
    pub hide_optional_fields: Option<bool>,
    #[serde(default)]
    pub is_ready_to_save: bool,
    pub form_data: Option<PersistedRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    SelectType {
        #[serde(rename = "fieldType")]
        field_type: String,
    },
    SelectField {
        field: Field,
    },
    Submit {
        field: Field,
    },
    /// Submit the open session's own field, with extra keys merged in.
    /// Lets a script finish a creation without knowing the generated id.
    SubmitCurrent {
        #[serde(default)]
        config: Map<String, Value>,
    },
    Delete {
        id: String,
    },
    Cancel,
    ChangeOrder {
        fields: Vec<Field>,
    },
    ChangeMetadata {
        change: MetadataChange,
    },
    HostUpdate {
        #[serde(rename = "isReadyToSave", default)]
        is_ready_to_save: bool,
        #[serde(rename = "formData", default)]
        form_data: Option<PersistedRef>,
    },
    Inspect,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub props: ScriptProps,
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl Script {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScriptError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ScriptError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

/// One line of replay output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Emitted {
    DocChanged {
        doc: FormDoc,
    },
    Save {
        form: FormData,
    },
    #[serde(rename_all = "camelCase")]
    Inspect {
        mode: SessionMode,
        editor: Value,
        preview: Value,
    },
    #[serde(rename_all = "camelCase")]
    State {
        mode: SessionMode,
        unsaved_fields: usize,
        doc: FormDoc,
    },
}

/// Observer that keeps every host event for later output
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<Emitted>,
}

impl ComposerObserver for RecordingObserver {
    fn on_doc_change(&mut self, doc: &FormDoc) -> Result<()> {
        self.events.push(Emitted::DocChanged { doc: doc.clone() });
        Ok(())
    }

    fn save_form(&mut self, form: FormData) -> Result<()> {
        self.events.push(Emitted::Save { form });
        Ok(())
    }
}

/// Replays scripts, resolving named persisted references along the way
#[derive(Debug, Default)]
pub struct ScriptRunner {
    config: ComposerConfig,
    references: HashMap<String, Arc<FormData>>,
}

impl ScriptRunner {
    pub fn new(config: ComposerConfig) -> Self {
        Self {
            config,
            references: HashMap::new(),
        }
    }

    /// Run every command and return the recorded events, ending with the
    /// final state.
    pub fn run(&mut self, script: Script) -> Result<Vec<Emitted>, ScriptError> {
        let props = self.mount_props(script.props)?;
        let mut composer = Composer::new(props, RecordingObserver::default());

        for (step, command) in script.commands.into_iter().enumerate() {
            debug!(step, ?command, "replaying command");
            self.apply(&mut composer, command)?;
        }

        let state = Emitted::State {
            mode: composer.mode(),
            unsaved_fields: composer
                .fields()
                .iter()
                .filter(|f| TempIdGenerator::is_temporary(&f.id))
                .count(),
            doc: composer.doc(),
        };
        composer.observer_mut().events.push(state);

        Ok(std::mem::take(&mut composer.observer_mut().events))
    }

    fn mount_props(&mut self, props: ScriptProps) -> Result<ComposerProps, ScriptError> {
        Ok(ComposerProps {
            form: props.form,
            fields: props.fields,
            form_type: props
                .form_type
                .unwrap_or_else(|| self.config.form_type_or_default().to_string()),
            hide_optional_fields: props
                .hide_optional_fields
                .unwrap_or_else(|| self.config.hide_optional_fields_or_default()),
            is_ready_to_save: props.is_ready_to_save,
            form_data: self.resolve(props.form_data)?,
        })
    }

    fn apply(
        &mut self,
        composer: &mut Composer<RecordingObserver>,
        command: Command,
    ) -> Result<(), ScriptError> {
        match command {
            Command::SelectType { field_type } => composer.select_field_type(&field_type),
            Command::SelectField { field } => composer.select_field(field),
            Command::Submit { field } => composer.submit_field(field),
            Command::SubmitCurrent { config } => match composer.session().field().cloned() {
                Some(mut field) => {
                    field.config.extend(config);
                    composer.submit_field(field);
                }
                None => warn!("no field is being edited, nothing to submit"),
            },
            Command::Delete { id } => composer.delete_field(&id),
            Command::Cancel => composer.cancel_edit(),
            Command::ChangeOrder { fields } => composer.change_fields_order(fields),
            Command::ChangeMetadata { change } => {
                if composer.hide_optional_fields() {
                    warn!(?change, "optional fields are hidden, ignoring metadata edit");
                } else {
                    composer.change_metadata(change);
                }
            }
            Command::HostUpdate {
                is_ready_to_save,
                form_data,
            } => {
                let form_data = self.resolve(form_data)?;
                composer.receive_host_update(HostUpdate {
                    is_ready_to_save,
                    form_data,
                });
            }
            Command::Inspect => {
                let event = Emitted::Inspect {
                    mode: composer.mode(),
                    editor: serde_json::to_value(composer.editor())?,
                    preview: serde_json::to_value(composer.preview())?,
                };
                composer.observer_mut().events.push(event);
            }
        }
        Ok(())
    }

    fn resolve(
        &mut self,
        reference: Option<PersistedRef>,
    ) -> Result<Option<Arc<FormData>>, ScriptError> {
        let Some(reference) = reference else {
            return Ok(None);
        };

        match reference.data {
            Some(data) => {
                let shared = Arc::new(data);
                self.references.insert(reference.name, Arc::clone(&shared));
                Ok(Some(shared))
            }
            None => self
                .references
                .get(&reference.name)
                .cloned()
                .map(Some)
                .ok_or(ScriptError::UnknownReference(reference.name)),
        }
    }
}
