//! Build-time construction of immutable open-addressing hash indices.
//!
//! A [`HashIndex`] is built once from an ordered key list (and optionally a
//! parallel value list) and lays its arrays out exactly the way the runtime
//! hash table does after inserting the same keys one by one. The code
//! generator can embed those arrays as a preloaded constant and the runtime
//! reads them without any insertion step.

#![warn(missing_docs)]

pub mod builder;
pub mod error;
pub mod index;
pub mod layout;

pub use builder::{
    shift_for, slot_for, table_size_for, IndexBuilder, GOLDEN_RATIO, INITIAL_MAX_PROBE_DISTANCE,
    MAX_TABLE_SIZE,
};
pub use error::IndexError;
pub use index::HashIndex;
pub use layout::IndexLayout;
