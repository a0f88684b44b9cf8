//! Model module - the scoring artifact and how it is loaded

pub mod artifact;
pub mod error;
pub mod loader;

pub use artifact::*;
pub use error::*;
pub use loader::*;
