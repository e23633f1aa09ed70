//! adaptest-suppliers — Question supplier integrations.
//!
//! Implements the `QuestionSupplier` trait for the OpenRouter question
//! generation backend, plus the intake step that validates and pads a
//! supplier's output into a usable question pool.

pub mod config;
pub mod error;
pub mod intake;
pub mod mock;
pub mod openrouter;

pub use config::{create_supplier, load_settings, SupplierSettings};
pub use error::SupplierError;
pub use intake::finalize_supply;
