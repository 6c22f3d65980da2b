//! Data models for the plugconf crate.
//!
//! This module contains the core data structures shared across the crate:
//! - [`ConfigValue`]: Loosely-typed scalar/nested value as found in user-edited YAML
//! - [`ConfigDocument`]: Ordered key/value document persisted to the plugin's data folder
//! - [`FIELD_CONFIG_VERSION`] / [`FIELD_LANG`]: The two keys every valid document must carry
//!
//! # Architecture Note
//!
//! The models are designed to be:
//! - **Serializable**: [`ConfigValue`] derives `Serialize`/`Deserialize` for YAML persistence
//! - **Order-preserving**: documents are `IndexMap`-backed so user file layout survives rewrites
//! - **Loosely typed**: type expectations are enforced by [`crate::validation`], not the model

pub mod document;

pub use document::{ConfigDocument, ConfigValue, FIELD_CONFIG_VERSION, FIELD_LANG};
