//! Shared helpers used by the models and services.

pub mod id;
pub mod temporal;

pub use id::new_id;
