//! The graph intermediate representation consumed by the emitter.

pub mod config;
pub mod kind;
pub mod literal;
pub mod node;
pub mod port;

pub use kind::*;
pub use literal::*;
pub use node::*;
pub use port::*;
