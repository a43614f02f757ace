//! Oila Storage - Storage backends for the household platform
//!
//! This crate provides storage backends for persisting household data
//! behind the [`oila_core::HouseholdStore`] trait.

pub mod error;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
