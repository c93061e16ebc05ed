#![forbid(unsafe_code)]

//! Sherpa Plugin System
//!
//! Tutorials reach the application packaged as plugins: distributable units
//! exposing lifecycle hooks and a tutorial producer. This crate owns the
//! whole plugin lifecycle:
//!
//! - [`TutorialPlugin`] / [`PluginFactory`] - the contract plugin authors
//!   implement
//! - [`PluginManager`] - discovery, loading, unload/reload, and external
//!   import
//! - [`TutorialCatalog`] - the shared, id-keyed catalog of loaded tutorials
//!
//! # Failure policy
//! Plugin code is untrusted. Every entry point into it runs behind a panic
//! boundary, and every failure (bad factory, refused initialization, invalid
//! tutorial, id collision) is logged and contained: one broken plugin never
//! takes the rest of the catalog or the application down.

pub mod catalog;
pub mod contract;
pub mod error;
pub mod manager;

pub use catalog::TutorialCatalog;
pub use contract::{PluginFactory, PluginMetadata, TutorialPlugin};
pub use error::{PluginError, Result, TutorialRejection};
pub use manager::PluginManager;
