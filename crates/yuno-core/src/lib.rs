//! Yuno Core Library
//!
//! Domain models and business logic for the Yuno task manager.

pub mod config;
pub mod error;
pub mod feedback;
pub mod project;
pub mod task;
pub mod task_item;

pub use error::{YunoError, YunoResult};
