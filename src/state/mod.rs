//! Composer state module

mod forms;

pub use forms::*;
