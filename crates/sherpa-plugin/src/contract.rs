//! The contract plugin authors implement.
//!
//! A plugin module on disk is paired with a registered [`PluginFactory`]
//! claiming its module name. The factory's single `create()` entry point is
//! the typed replacement for reflective "scan the module for a class that
//! looks right" discovery: the manager validates the claim structurally
//! (exactly one factory per module) before any plugin code runs.

use sherpa_core::Tutorial;

/// Descriptive metadata a plugin reports about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginMetadata {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
}

/// A loaded plugin instance.
///
/// The [`PluginManager`](crate::PluginManager) exclusively owns the instance
/// and everything it returns. Tutorials are copied into the shared catalog at
/// load time; the plugin is never consulted again until `cleanup`.
pub trait TutorialPlugin {
    /// Unique id of this plugin.
    fn plugin_id(&self) -> &str;

    /// Descriptive metadata.
    fn metadata(&self) -> PluginMetadata;

    /// Produce the tutorials this plugin distributes.
    ///
    /// Called once, after a successful `initialize`. Returned tutorials must
    /// leave `plugin_source` unset; the loader stamps it.
    fn tutorials(&self) -> Vec<Tutorial>;

    /// One-time setup. Returning `false` aborts the load and the plugin is
    /// discarded without registration.
    fn initialize(&mut self) -> bool;

    /// Teardown, called on unload. Must not assume `initialize` succeeded.
    fn cleanup(&mut self);
}

/// Creates plugin instances for one module name.
///
/// Factories are registered with the manager up front; discovery only decides
/// *which* of them get instantiated, based on what is present in the plugin
/// directory.
pub trait PluginFactory {
    /// The module (file stem) this factory claims.
    fn module_name(&self) -> &str;

    /// Instantiate a fresh plugin.
    fn create(&self) -> Box<dyn TutorialPlugin>;
}
