//! Temporary field ids

use super::traits::IdGenerator;
use uuid::Uuid;

/// Prefix that marks an id as not yet persisted
pub const TEMP_ID_PREFIX: &str = "tempId";

/// Generates `tempId<uuid-v4>` ids.
///
/// The prefix keeps them apart from storage-assigned ids and the random
/// UUID keeps them apart from each other.
#[derive(Debug, Clone, Copy, Default)]
pub struct TempIdGenerator;

impl TempIdGenerator {
    pub fn is_temporary(id: &str) -> bool {
        id.starts_with(TEMP_ID_PREFIX)
    }
}

impl IdGenerator for TempIdGenerator {
    fn next_id(&mut self) -> String {
        format!("{TEMP_ID_PREFIX}{}", Uuid::new_v4().simple())
    }
}
