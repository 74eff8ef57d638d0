//! Detector output normalization.
//!
//! Turns whatever a detector emits per box into canonical [`Detection`]
//! records. The stage is pure: no I/O, no async, and a bad record only
//! costs itself.
//!
//! - **class_table**: index → label lookup for the detector's classes
//! - **raw**: the [`RawDetection`] view over detector-native records
//! - **normalize**: the [`Normalizer`] itself
//!
//! [`Detection`]: crate::types::Detection

pub mod class_table;
pub mod normalize;
pub mod raw;

pub use class_table::ClassTable;
pub use normalize::{NormalizeReport, Normalizer};
pub use raw::{ClassRef, RawBox, RawDetection};
