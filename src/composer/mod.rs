//! Form composition engine and its host seams

mod engine;
mod ids;
mod traits;

pub use engine::{Composer, ComposerProps, HostUpdate};
pub use ids::TempIdGenerator;
pub use traits::ComposerObserver;

#[cfg(test)]
pub use traits::{MockComposerObserver, MockIdGenerator};
