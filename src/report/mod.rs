//! Report module - summarizing and exporting predictions

pub mod distribution;
pub mod export;
pub mod high_risk;
pub mod summary;

pub use distribution::*;
pub use export::*;
pub use high_risk::*;
pub use summary::*;
