//! Pipeline module - loading tables and scoring them

pub mod loader;
pub mod predictor;
pub mod risk;
pub mod sample;
pub mod schema;

pub use loader::*;
pub use predictor::*;
pub use risk::*;
pub use sample::*;
pub use schema::*;
