//! The editor's JSON snapshot format.

pub mod types;

pub use types::*;
