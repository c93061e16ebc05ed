//! Plugin discovery, loading, and lifecycle.
//!
//! [`PluginManager`] pairs a plugin directory on disk with a registry of
//! typed [`PluginFactory`] entries. `discover` is a pure directory scan;
//! `load` dispatches a discovered module name through the factory registry,
//! runs the plugin's lifecycle behind a panic boundary, and copies its
//! tutorials into the shared [`TutorialCatalog`].
//!
//! Loading is synchronous and expected at application start or on explicit
//! user request, never on a hot path.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sherpa_core::Tutorial;

use crate::catalog::TutorialCatalog;
use crate::contract::{PluginFactory, PluginMetadata, TutorialPlugin};
use crate::error::{PluginError, Result};

struct LoadedPlugin {
    plugin_id: String,
    module_name: String,
    plugin: Box<dyn TutorialPlugin>,
}

/// Owns the factory registry, the loaded plugin instances, and the catalog.
pub struct PluginManager {
    plugin_dir: PathBuf,
    factories: Vec<Box<dyn PluginFactory>>,
    loaded: Vec<LoadedPlugin>,
    catalog: TutorialCatalog,
}

impl PluginManager {
    /// Create a manager over the given plugin directory.
    #[must_use]
    pub fn new(plugin_dir: impl Into<PathBuf>) -> Self {
        Self {
            plugin_dir: plugin_dir.into(),
            factories: Vec::new(),
            loaded: Vec::new(),
            catalog: TutorialCatalog::new(),
        }
    }

    /// Register a factory for one plugin module.
    pub fn register_factory(&mut self, factory: Box<dyn PluginFactory>) {
        self.factories.push(factory);
    }

    /// List candidate plugin module names in the plugin directory.
    ///
    /// Pure scan, no side effects: non-hidden files, by stem, sorted and
    /// deduplicated.
    pub fn discover(&self) -> Result<Vec<String>> {
        let mut modules = Vec::new();
        for entry in std::fs::read_dir(&self.plugin_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.starts_with('.') || stem.is_empty() {
                continue;
            }
            modules.push(stem.to_string());
        }
        modules.sort();
        modules.dedup();
        Ok(modules)
    }

    /// Load one module. Returns `true` on success.
    ///
    /// Any failure is logged and leaves the manager exactly as it was.
    pub fn load(&mut self, module: &str) -> bool {
        match self.try_load(module) {
            Ok(plugin_id) => {
                tracing::info!(module, plugin_id, "plugin loaded");
                true
            }
            Err(err) => {
                tracing::warn!(module, %err, "plugin load failed");
                false
            }
        }
    }

    /// Load one module, returning the plugin id or the failure reason.
    pub fn try_load(&mut self, module: &str) -> Result<String> {
        let claims: Vec<&dyn PluginFactory> = self
            .factories
            .iter()
            .map(AsRef::as_ref)
            .filter(|factory| factory.module_name() == module)
            .collect();
        let factory = match claims.as_slice() {
            [] => {
                return Err(PluginError::NoFactory {
                    module: module.into(),
                });
            }
            [one] => *one,
            many => {
                return Err(PluginError::AmbiguousFactory {
                    module: module.into(),
                    count: many.len(),
                });
            }
        };

        let mut plugin = guard(module, "create", || factory.create())?;

        let plugin_id = plugin.plugin_id().to_string();
        if plugin_id.trim().is_empty() {
            return Err(PluginError::EmptyPluginId {
                module: module.into(),
            });
        }
        if self.is_loaded(&plugin_id) {
            return Err(PluginError::AlreadyLoaded { plugin_id });
        }

        let initialized = guard(module, "initialize", || plugin.initialize())?;
        if !initialized {
            return Err(PluginError::InitializeFailed { plugin_id });
        }

        let tutorials = match guard(module, "tutorials", || plugin.tutorials()) {
            Ok(tutorials) => tutorials,
            Err(err) => {
                // Initialization succeeded, so give the plugin its teardown
                // before discarding it.
                let _ = catch_unwind(AssertUnwindSafe(|| plugin.cleanup()));
                return Err(err);
            }
        };

        let mut accepted = 0usize;
        for tutorial in tutorials {
            accepted += usize::from(self.register_tutorial(&plugin_id, tutorial));
        }
        tracing::debug!(plugin_id, accepted, "tutorials catalogued");

        self.loaded.push(LoadedPlugin {
            plugin_id: plugin_id.clone(),
            module_name: module.to_string(),
            plugin,
        });
        Ok(plugin_id)
    }

    fn register_tutorial(&mut self, plugin_id: &str, mut tutorial: Tutorial) -> bool {
        if let Some(claimed) = tutorial.plugin_source.take() {
            // Provenance is loader-owned; content has no say in it.
            tracing::warn!(
                plugin_id,
                tutorial_id = tutorial.id,
                claimed,
                "tutorial tried to set its own plugin_source; overwritten"
            );
        }
        tutorial.plugin_source = Some(plugin_id.to_string());
        match self.catalog.insert(tutorial) {
            Ok(()) => true,
            Err(rejection) => {
                tracing::warn!(plugin_id, %rejection, "tutorial rejected");
                false
            }
        }
    }

    /// Load every discovered module. Returns the number of successes.
    ///
    /// A failing module never aborts the rest.
    pub fn load_all(&mut self) -> usize {
        let modules = match self.discover() {
            Ok(modules) => modules,
            Err(err) => {
                tracing::warn!(dir = %self.plugin_dir.display(), %err, "plugin discovery failed");
                return 0;
            }
        };
        modules
            .iter()
            .filter(|module| self.load(module))
            .count()
    }

    /// Unload a plugin and drop its tutorials from the catalog.
    pub fn unload(&mut self, plugin_id: &str) -> bool {
        let Some(index) = self
            .loaded
            .iter()
            .position(|loaded| loaded.plugin_id == plugin_id)
        else {
            tracing::debug!(plugin_id, "unload requested for unknown plugin");
            return false;
        };
        let mut loaded = self.loaded.remove(index);
        if catch_unwind(AssertUnwindSafe(|| loaded.plugin.cleanup())).is_err() {
            tracing::warn!(plugin_id, "plugin panicked during cleanup");
        }
        let removed = self.catalog.remove_plugin(plugin_id);
        tracing::info!(plugin_id, removed, "plugin unloaded");
        true
    }

    /// Unload then load the same module again.
    ///
    /// If the reload fails the plugin stays unloaded; there is no rollback to
    /// the previous instance.
    pub fn reload(&mut self, plugin_id: &str) -> bool {
        let Some(module) = self
            .loaded
            .iter()
            .find(|loaded| loaded.plugin_id == plugin_id)
            .map(|loaded| loaded.module_name.clone())
        else {
            tracing::debug!(plugin_id, "reload requested for unknown plugin");
            return false;
        };
        self.unload(plugin_id);
        self.load(&module)
    }

    /// Copy an external module file into the plugin directory and load it.
    pub fn import_from_external_location(&mut self, path: &Path) -> bool {
        match self.try_import(path) {
            Ok(plugin_id) => {
                tracing::info!(path = %path.display(), plugin_id, "external plugin imported");
                true
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "external plugin import failed");
                false
            }
        }
    }

    fn try_import(&mut self, path: &Path) -> Result<String> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| PluginError::InvalidImportPath {
                path: path.to_path_buf(),
            })?;
        let module = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| PluginError::InvalidImportPath {
                path: path.to_path_buf(),
            })?
            .to_string();
        std::fs::copy(path, self.plugin_dir.join(file_name))?;
        self.try_load(&module)
    }

    /// Whether a plugin id is currently loaded.
    #[must_use]
    pub fn is_loaded(&self, plugin_id: &str) -> bool {
        self.loaded
            .iter()
            .any(|loaded| loaded.plugin_id == plugin_id)
    }

    /// Ids of loaded plugins, in load order.
    #[must_use]
    pub fn loaded_plugins(&self) -> Vec<&str> {
        self.loaded
            .iter()
            .map(|loaded| loaded.plugin_id.as_str())
            .collect()
    }

    /// Metadata of a loaded plugin.
    #[must_use]
    pub fn plugin_metadata(&self, plugin_id: &str) -> Option<PluginMetadata> {
        self.loaded
            .iter()
            .find(|loaded| loaded.plugin_id == plugin_id)
            .map(|loaded| loaded.plugin.metadata())
    }

    /// The shared catalog.
    #[must_use]
    pub fn catalog(&self) -> &TutorialCatalog {
        &self.catalog
    }

    /// All loaded tutorials.
    #[must_use]
    pub fn all_tutorials(&self) -> Vec<Arc<Tutorial>> {
        self.catalog.all()
    }

    /// Loaded tutorials in the given category.
    #[must_use]
    pub fn tutorials_by_category(&self, category: &str) -> Vec<Arc<Tutorial>> {
        self.catalog.by_category(category)
    }

    /// Look up a loaded tutorial by id.
    #[must_use]
    pub fn tutorial_by_id(&self, id: &str) -> Option<Arc<Tutorial>> {
        self.catalog.get(id)
    }
}

impl core::fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PluginManager")
            .field("plugin_dir", &self.plugin_dir)
            .field("factories", &self.factories.len())
            .field("loaded", &self.loaded_plugins())
            .field("catalog_len", &self.catalog.len())
            .finish()
    }
}

/// Run untrusted plugin code, converting a panic into a contained error.
fn guard<T>(module: &str, call: &'static str, body: impl FnOnce() -> T) -> Result<T> {
    catch_unwind(AssertUnwindSafe(body)).map_err(|_| PluginError::PluginPanicked {
        module: module.into(),
        call,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sherpa_core::Step;
    use std::cell::Cell;
    use std::rc::Rc;

    enum InitBehavior {
        Ok,
        Refuse,
        Panic,
    }

    struct FakePlugin {
        id: String,
        tutorials: Vec<Tutorial>,
        init: InitBehavior,
        panic_in_tutorials: bool,
        cleanups: Rc<Cell<usize>>,
    }

    impl TutorialPlugin for FakePlugin {
        fn plugin_id(&self) -> &str {
            &self.id
        }

        fn metadata(&self) -> PluginMetadata {
            PluginMetadata {
                name: self.id.clone(),
                version: "1.0.0".into(),
                description: "fake".into(),
                author: "tests".into(),
            }
        }

        fn tutorials(&self) -> Vec<Tutorial> {
            assert!(!self.panic_in_tutorials, "tutorials() panic requested");
            self.tutorials.clone()
        }

        fn initialize(&mut self) -> bool {
            match self.init {
                InitBehavior::Ok => true,
                InitBehavior::Refuse => false,
                InitBehavior::Panic => panic!("initialize blew up"),
            }
        }

        fn cleanup(&mut self) {
            self.cleanups.set(self.cleanups.get() + 1);
        }
    }

    struct FakeFactory {
        module: String,
        plugin_id: String,
        tutorials: Vec<Tutorial>,
        init: InitBehavior,
        panic_in_tutorials: bool,
        cleanups: Rc<Cell<usize>>,
        creations: Rc<Cell<usize>>,
        panic_on_create_after: Option<usize>,
    }

    impl FakeFactory {
        fn healthy(module: &str, plugin_id: &str, tutorials: Vec<Tutorial>) -> Self {
            Self {
                module: module.into(),
                plugin_id: plugin_id.into(),
                tutorials,
                init: InitBehavior::Ok,
                panic_in_tutorials: false,
                cleanups: Rc::new(Cell::new(0)),
                creations: Rc::new(Cell::new(0)),
                panic_on_create_after: None,
            }
        }
    }

    impl PluginFactory for FakeFactory {
        fn module_name(&self) -> &str {
            &self.module
        }

        fn create(&self) -> Box<dyn TutorialPlugin> {
            let count = self.creations.get();
            self.creations.set(count + 1);
            if let Some(limit) = self.panic_on_create_after {
                assert!(count < limit, "create() panic requested");
            }
            Box::new(FakePlugin {
                id: self.plugin_id.clone(),
                tutorials: self.tutorials.clone(),
                init: match self.init {
                    InitBehavior::Ok => InitBehavior::Ok,
                    InitBehavior::Refuse => InitBehavior::Refuse,
                    InitBehavior::Panic => InitBehavior::Panic,
                },
                panic_in_tutorials: self.panic_in_tutorials,
                cleanups: Rc::clone(&self.cleanups),
            })
        }
    }

    fn tutorial(id: &str) -> Tutorial {
        Tutorial::new(id, format!("Tutorial {id}"))
            .category("basics")
            .step(Step::new("step"))
    }

    fn manager_with_modules(modules: &[&str]) -> (PluginManager, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        for module in modules {
            std::fs::write(dir.path().join(format!("{module}.tour")), b"").unwrap();
        }
        (PluginManager::new(dir.path()), dir)
    }

    #[test]
    fn discover_lists_sorted_stems_without_hidden_files() {
        let (manager, dir) = manager_with_modules(&["zeta", "alpha"]);
        std::fs::write(dir.path().join(".hidden"), b"").unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();

        assert_eq!(manager.discover().unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn load_registers_tutorials_with_provenance() {
        let (mut manager, _dir) = manager_with_modules(&["basics"]);
        manager.register_factory(Box::new(FakeFactory::healthy(
            "basics",
            "p.basics",
            vec![tutorial("t1"), tutorial("t2")],
        )));

        assert!(manager.load("basics"));
        assert_eq!(manager.catalog().len(), 2);
        assert_eq!(
            manager.tutorial_by_id("t1").unwrap().plugin_source.as_deref(),
            Some("p.basics")
        );
        assert!(manager.is_loaded("p.basics"));
    }

    #[test]
    fn load_without_factory_fails() {
        let (mut manager, _dir) = manager_with_modules(&["orphan"]);
        assert!(matches!(
            manager.try_load("orphan"),
            Err(PluginError::NoFactory { .. })
        ));
        assert!(!manager.load("orphan"));
    }

    #[test]
    fn ambiguous_factories_fail_structural_validation() {
        let (mut manager, _dir) = manager_with_modules(&["dup"]);
        manager.register_factory(Box::new(FakeFactory::healthy("dup", "a", vec![])));
        manager.register_factory(Box::new(FakeFactory::healthy("dup", "b", vec![])));

        assert!(matches!(
            manager.try_load("dup"),
            Err(PluginError::AmbiguousFactory { count: 2, .. })
        ));
        assert!(manager.loaded_plugins().is_empty());
    }

    #[test]
    fn refused_initialize_is_not_registered() {
        let (mut manager, _dir) = manager_with_modules(&["shy"]);
        let mut factory = FakeFactory::healthy("shy", "p.shy", vec![tutorial("t1")]);
        factory.init = InitBehavior::Refuse;
        manager.register_factory(Box::new(factory));

        assert!(!manager.load("shy"));
        assert!(manager.catalog().is_empty());
        assert!(!manager.is_loaded("p.shy"));
    }

    #[test]
    fn panicking_initialize_is_isolated_from_healthy_plugins() {
        let (mut manager, _dir) = manager_with_modules(&["bad", "good"]);
        let mut bad = FakeFactory::healthy("bad", "p.bad", vec![tutorial("t.bad")]);
        bad.init = InitBehavior::Panic;
        manager.register_factory(Box::new(bad));
        manager.register_factory(Box::new(FakeFactory::healthy(
            "good",
            "p.good",
            vec![tutorial("t.good")],
        )));

        assert_eq!(manager.load_all(), 1);
        assert_eq!(manager.loaded_plugins(), vec!["p.good"]);
        assert!(manager.tutorial_by_id("t.good").is_some());
        assert!(manager.tutorial_by_id("t.bad").is_none());
    }

    #[test]
    fn panicking_tutorials_gets_cleanup_and_no_registration() {
        let (mut manager, _dir) = manager_with_modules(&["boom"]);
        let mut factory = FakeFactory::healthy("boom", "p.boom", vec![]);
        factory.panic_in_tutorials = true;
        let cleanups = Rc::clone(&factory.cleanups);
        manager.register_factory(Box::new(factory));

        assert!(!manager.load("boom"));
        assert_eq!(cleanups.get(), 1);
        assert!(!manager.is_loaded("p.boom"));
    }

    #[test]
    fn id_collision_across_plugins_first_wins() {
        let (mut manager, _dir) = manager_with_modules(&["first", "second"]);
        manager.register_factory(Box::new(FakeFactory::healthy(
            "first",
            "p.first",
            vec![tutorial("shared")],
        )));
        manager.register_factory(Box::new(FakeFactory::healthy(
            "second",
            "p.second",
            vec![tutorial("shared"), tutorial("unique")],
        )));

        assert_eq!(manager.load_all(), 2);
        assert_eq!(manager.catalog().len(), 2);
        assert_eq!(
            manager.tutorial_by_id("shared").unwrap().plugin_source.as_deref(),
            Some("p.first")
        );
        assert!(manager.tutorial_by_id("unique").is_some());
    }

    #[test]
    fn invalid_tutorial_skipped_but_siblings_accepted() {
        let (mut manager, _dir) = manager_with_modules(&["mixed"]);
        let invalid = Tutorial::new("", "No id");
        manager.register_factory(Box::new(FakeFactory::healthy(
            "mixed",
            "p.mixed",
            vec![invalid, tutorial("valid")],
        )));

        assert!(manager.load("mixed"));
        assert_eq!(manager.catalog().len(), 1);
        assert!(manager.tutorial_by_id("valid").is_some());
    }

    #[test]
    fn content_supplied_provenance_is_overwritten() {
        let (mut manager, _dir) = manager_with_modules(&["sneaky"]);
        let mut forged = tutorial("t1");
        forged.plugin_source = Some("somebody-else".into());
        manager.register_factory(Box::new(FakeFactory::healthy(
            "sneaky",
            "p.sneaky",
            vec![forged],
        )));

        assert!(manager.load("sneaky"));
        assert_eq!(
            manager.tutorial_by_id("t1").unwrap().plugin_source.as_deref(),
            Some("p.sneaky")
        );
    }

    #[test]
    fn unload_removes_tutorials_and_calls_cleanup() {
        let (mut manager, _dir) = manager_with_modules(&["basics"]);
        let factory = FakeFactory::healthy("basics", "p.basics", vec![tutorial("t1")]);
        let cleanups = Rc::clone(&factory.cleanups);
        manager.register_factory(Box::new(factory));
        manager.load("basics");

        assert!(manager.unload("p.basics"));
        assert_eq!(cleanups.get(), 1);
        assert!(manager.catalog().is_empty());
        assert!(!manager.is_loaded("p.basics"));
        assert!(!manager.unload("p.basics"));
    }

    #[test]
    fn reload_produces_a_fresh_instance() {
        let (mut manager, _dir) = manager_with_modules(&["basics"]);
        let factory = FakeFactory::healthy("basics", "p.basics", vec![tutorial("t1")]);
        let creations = Rc::clone(&factory.creations);
        manager.register_factory(Box::new(factory));
        manager.load("basics");

        assert!(manager.reload("p.basics"));
        assert_eq!(creations.get(), 2);
        assert_eq!(manager.catalog().len(), 1);
        assert!(!manager.reload("p.unknown"));
    }

    #[test]
    fn failed_reload_leaves_plugin_unloaded() {
        let (mut manager, _dir) = manager_with_modules(&["flaky"]);
        let mut factory = FakeFactory::healthy("flaky", "p.flaky", vec![tutorial("t1")]);
        factory.panic_on_create_after = Some(1);
        manager.register_factory(Box::new(factory));
        manager.load("flaky");

        assert!(!manager.reload("p.flaky"));
        assert!(!manager.is_loaded("p.flaky"));
        assert!(manager.catalog().is_empty());
    }

    #[test]
    fn import_copies_module_and_loads_it() {
        let (mut manager, dir) = manager_with_modules(&[]);
        let external = tempfile::tempdir().unwrap();
        let source = external.path().join("extras.tour");
        std::fs::write(&source, b"").unwrap();
        manager.register_factory(Box::new(FakeFactory::healthy(
            "extras",
            "p.extras",
            vec![tutorial("t.extra")],
        )));

        assert!(manager.import_from_external_location(&source));
        assert!(dir.path().join("extras.tour").exists());
        assert!(manager.is_loaded("p.extras"));
        assert_eq!(manager.discover().unwrap(), vec!["extras"]);
    }

    #[test]
    fn plugin_metadata_exposed_for_loaded_plugins() {
        let (mut manager, _dir) = manager_with_modules(&["basics"]);
        manager.register_factory(Box::new(FakeFactory::healthy("basics", "p.basics", vec![])));
        manager.load("basics");

        let metadata = manager.plugin_metadata("p.basics").unwrap();
        assert_eq!(metadata.name, "p.basics");
        assert!(manager.plugin_metadata("p.other").is_none());
    }

    #[test]
    fn query_surface_filters_by_category() {
        let (mut manager, _dir) = manager_with_modules(&["basics"]);
        let advanced = Tutorial::new("t.adv", "Advanced")
            .category("advanced")
            .step(Step::new("s"));
        manager.register_factory(Box::new(FakeFactory::healthy(
            "basics",
            "p.basics",
            vec![tutorial("t1"), advanced],
        )));
        manager.load("basics");

        assert_eq!(manager.all_tutorials().len(), 2);
        assert_eq!(manager.tutorials_by_category("advanced").len(), 1);
        assert!(manager.tutorials_by_category("missing").is_empty());
    }
}
