//! Full-pipeline walkthrough: plugin load -> catalog browse -> run a
//! tutorial session against a fake host.

use std::collections::HashMap;
use std::time::Instant;

use sherpa_core::{
    Clipboard, ControlHandle, ControlResolver, MemorySettings, Rect, Step, Tutorial,
};
use sherpa_overlay::PanelButton;
use sherpa_plugin::{PluginFactory, PluginManager, PluginMetadata, TutorialPlugin};
use sherpa_runtime::{browser, HostContext, RuntimeEvent, SessionState, TutorialRuntime};

const SCREEN: Rect = Rect::new(0, 0, 1280, 800);

struct SqlTourPlugin;

impl TutorialPlugin for SqlTourPlugin {
    fn plugin_id(&self) -> &str {
        "sherpa.sql-tour"
    }

    fn metadata(&self) -> PluginMetadata {
        PluginMetadata {
            name: "SQL Tour".into(),
            version: "1.2.0".into(),
            description: "Guided tour of the query editor".into(),
            author: "sherpa tests".into(),
        }
    }

    fn tutorials(&self) -> Vec<Tutorial> {
        vec![
            Tutorial::new("sql.first-query", "Your first query")
                .category("sql")
                .estimated_minutes(5)
                .objective("run a query end to end")
                .step(
                    Step::new("Open the editor")
                        .instruction("Click the query editor tab.")
                        .target("editor-tab"),
                )
                .step(
                    Step::new("Paste the query")
                        .instruction("Copy the sample below into the editor.")
                        .copy_paste("SELECT * FROM users LIMIT 10;")
                        .target("editor-body"),
                )
                .step(
                    Step::new("Run it")
                        .instruction("Press the Run button and watch the results.")
                        .target("run-button")
                        .validate_with(|resolver| resolver.resolve("results-grid").is_some()),
                ),
            Tutorial::new("sql.joins", "Joining tables")
                .category("sql")
                .estimated_minutes(12)
                .step(Step::new("Intro")),
        ]
    }

    fn initialize(&mut self) -> bool {
        true
    }

    fn cleanup(&mut self) {}
}

struct SqlTourFactory;

impl PluginFactory for SqlTourFactory {
    fn module_name(&self) -> &str {
        "sql_tour"
    }

    fn create(&self) -> Box<dyn TutorialPlugin> {
        Box::new(SqlTourPlugin)
    }
}

#[derive(Default)]
struct FakeHostWindow {
    controls: HashMap<String, Rect>,
}

impl FakeHostWindow {
    fn add(&mut self, id: &str, rect: Rect) {
        self.controls.insert(id.to_string(), rect);
    }
}

struct FakeHandle(Rect);

impl ControlHandle for FakeHandle {
    fn screen_rect(&self) -> Rect {
        self.0
    }

    fn is_visible(&self) -> bool {
        true
    }
}

impl ControlResolver for FakeHostWindow {
    fn resolve(&self, logical_id: &str) -> Option<Box<dyn ControlHandle + '_>> {
        self.controls
            .get(logical_id)
            .map(|&rect| Box::new(FakeHandle(rect)) as Box<dyn ControlHandle>)
    }
}

#[derive(Default)]
struct FakeClipboard {
    texts: Vec<String>,
}

impl Clipboard for FakeClipboard {
    fn set_text(&mut self, text: &str) {
        self.texts.push(text.to_string());
    }
}

fn loaded_manager() -> (PluginManager, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("sql_tour.tour"), b"").unwrap();
    let mut manager = PluginManager::new(dir.path());
    manager.register_factory(Box::new(SqlTourFactory));
    assert_eq!(manager.load_all(), 1);
    (manager, dir)
}

#[test]
fn load_browse_and_complete_a_tutorial() {
    let (manager, _dir) = loaded_manager();

    // Browse: both tutorials are listed under the sql category.
    let listings = browser::by_category(manager.catalog());
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].category, "sql");
    assert_eq!(listings[0].rows.len(), 2);

    let detail = browser::detail(manager.catalog(), "sql.first-query").unwrap();
    assert_eq!(detail.step_titles.len(), 3);
    assert_eq!(detail.row.plugin_source.as_deref(), Some("sherpa.sql-tour"));

    // Host window with every control except the results grid, which only
    // appears after the query runs.
    let mut window = FakeHostWindow::default();
    window.add("editor-tab", Rect::new(40, 10, 120, 30));
    window.add("editor-body", Rect::new(40, 60, 800, 400));
    window.add("run-button", Rect::new(860, 60, 80, 30));

    let mut clipboard = FakeClipboard::default();
    let mut settings = MemorySettings::new();
    let mut runtime = TutorialRuntime::new(SCREEN, &settings);
    let now = Instant::now();

    {
        let mut host = HostContext {
            resolver: &window,
            clipboard: &mut clipboard,
            settings: &mut settings,
        };
        runtime
            .start(manager.catalog(), "sql.first-query", &mut host, now)
            .unwrap();
    }
    assert_eq!(runtime.state(), SessionState::StepActive);
    assert!(runtime.highlight(now).is_some());

    // Step 1 -> step 2 via the panel's Next button.
    {
        let mut host = HostContext {
            resolver: &window,
            clipboard: &mut clipboard,
            settings: &mut settings,
        };
        runtime.press(PanelButton::Next, &mut host, now);
    }
    assert_eq!(runtime.step_index(), Some(1));

    // Step 2 has a copy block; the Copy button fills the clipboard.
    {
        let mut host = HostContext {
            resolver: &window,
            clipboard: &mut clipboard,
            settings: &mut settings,
        };
        runtime.press(PanelButton::Copy, &mut host, now);
        runtime.press(PanelButton::Next, &mut host, now);
    }
    assert_eq!(clipboard.texts, vec!["SELECT * FROM users LIMIT 10;"]);
    assert_eq!(runtime.step_index(), Some(2));

    // Step 3 is gated on the results grid existing.
    {
        let mut host = HostContext {
            resolver: &window,
            clipboard: &mut clipboard,
            settings: &mut settings,
        };
        runtime.next(&mut host, now);
    }
    assert_eq!(runtime.step_index(), Some(2));

    window.add("results-grid", Rect::new(40, 480, 900, 280));
    {
        let mut host = HostContext {
            resolver: &window,
            clipboard: &mut clipboard,
            settings: &mut settings,
        };
        runtime.next(&mut host, now);
    }

    assert_eq!(runtime.state(), SessionState::Completed);
    assert_eq!(runtime.step_index(), Some(3));
    assert!(!runtime.presenter().is_visible());

    let events = runtime.drain_events();
    let completed = events
        .iter()
        .filter(|e| matches!(e, RuntimeEvent::Completed { .. }))
        .count();
    assert_eq!(completed, 1);
    assert!(
        events
            .iter()
            .all(|e| !matches!(e, RuntimeEvent::Cancelled { .. }))
    );
    assert!(events.contains(&RuntimeEvent::ValidationFailed { index: 2 }));
}

#[test]
fn unload_makes_tutorials_unstartable() {
    let (mut manager, _dir) = loaded_manager();
    assert!(manager.unload("sherpa.sql-tour"));

    let window = FakeHostWindow::default();
    let mut clipboard = FakeClipboard::default();
    let mut settings = MemorySettings::new();
    let mut runtime = TutorialRuntime::new(SCREEN, &settings);
    let mut host = HostContext {
        resolver: &window,
        clipboard: &mut clipboard,
        settings: &mut settings,
    };

    assert!(
        runtime
            .start(manager.catalog(), "sql.first-query", &mut host, Instant::now())
            .is_err()
    );
    assert_eq!(runtime.state(), SessionState::Idle);
    assert!(browser::all_rows(manager.catalog()).is_empty());
}
