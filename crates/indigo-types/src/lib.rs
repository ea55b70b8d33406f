//! # indigo-types
//!
//! Shared types for the Indigo record store:
//! - [`IndigoError`]: the error family every public operation returns
//! - [`Settings`]: layered configuration
//! - [`validate_id`] / [`ItemId`]: store id rules
//! - [`Entity`]: the contract records implement

pub mod config;
pub mod entity;
pub mod error;
pub mod ids;

pub use config::{IndexSettings, SelectorKind, Settings, TransactionSettings};
pub use entity::Entity;
pub use error::IndigoError;
pub use ids::{id_as_string, ids_as_strings, is_numeric_id, is_valid_id, validate_id, ItemId};
