//! End-to-end executor flows over fake driver and document ports.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use action_executor::{
    execute, ActionState, Actionability, DriverPort, ExecCtx, ExecutorPolicy, FailCause,
    OptionEntry, RuntimeDeps,
};
use action_locator::{DomPort, ElementHandle, PathStep, ResolvedLocator};
use async_trait::async_trait;
use interpreter_bridge::{ActionMethod, ActionProposal};
use pagepilot_core_types::{AutomationError, NodeId, SnapshotId};

#[derive(Default)]
struct FakeDriver {
    calls: Mutex<Vec<String>>,
    options: Vec<OptionEntry>,
    visible_texts: HashMap<String, ElementHandle>,
    page_height: f64,
    /// When true every probe reports a detached element.
    never_actionable: bool,
}

impl FakeDriver {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl DriverPort for FakeDriver {
    async fn click(&self, element: &ElementHandle) -> Result<(), AutomationError> {
        self.record(format!("click {}", element.0));
        Ok(())
    }

    async fn hover(&self, element: &ElementHandle) -> Result<(), AutomationError> {
        self.record(format!("hover {}", element.0));
        Ok(())
    }

    async fn clear_value(&self, element: &ElementHandle) -> Result<(), AutomationError> {
        self.record(format!("clear {}", element.0));
        Ok(())
    }

    async fn set_value(&self, element: &ElementHandle, text: &str) -> Result<(), AutomationError> {
        self.record(format!("set {} {}", element.0, text));
        Ok(())
    }

    async fn key_stroke(&self, element: &ElementHandle, ch: char) -> Result<(), AutomationError> {
        self.record(format!("stroke {} {ch}", element.0));
        Ok(())
    }

    async fn options_of(
        &self,
        _element: &ElementHandle,
    ) -> Result<Vec<OptionEntry>, AutomationError> {
        Ok(self.options.clone())
    }

    async fn select_by_text(
        &self,
        element: &ElementHandle,
        text: &str,
    ) -> Result<(), AutomationError> {
        self.record(format!("select {} {}", element.0, text));
        Ok(())
    }

    async fn find_text(&self, text: &str) -> Result<Option<ElementHandle>, AutomationError> {
        self.record(format!("find {text}"));
        Ok(self.visible_texts.get(text).cloned())
    }

    async fn key_press(&self, key: &str) -> Result<(), AutomationError> {
        self.record(format!("press {key}"));
        Ok(())
    }

    async fn page_height(&self) -> Result<f64, AutomationError> {
        Ok(self.page_height)
    }

    async fn scroll_to_offset(&self, offset: f64) -> Result<(), AutomationError> {
        self.record(format!("scroll-to {offset}"));
        Ok(())
    }

    async fn scroll_into_view(&self, element: &ElementHandle) -> Result<(), AutomationError> {
        self.record(format!("scroll-into-view {}", element.0));
        Ok(())
    }

    async fn probe(&self, _element: &ElementHandle) -> Result<Actionability, AutomationError> {
        if self.never_actionable {
            return Ok(Actionability::default());
        }
        Ok(Actionability {
            attached: true,
            visible: true,
            enabled: true,
            position: (10.0, 20.0),
        })
    }
}

/// Edge map keyed by (parent handle, tag, sibling index); the root parent is
/// the empty string. `misses` swallows that many lookups first, simulating an
/// element that has not painted yet.
#[derive(Default)]
struct FakeDom {
    edges: HashMap<(String, String, usize), String>,
    misses: AtomicUsize,
}

impl FakeDom {
    fn with_path(steps: &[(&str, usize)]) -> Self {
        let mut edges = HashMap::new();
        let mut parent = String::new();
        for (tag, index) in steps {
            let handle = format!("{parent}/{tag}[{index}]");
            edges.insert((parent.clone(), tag.to_string(), *index), handle.clone());
            parent = handle;
        }
        Self {
            edges,
            misses: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DomPort for FakeDom {
    async fn query_step(
        &self,
        parent: Option<&ElementHandle>,
        tag: &str,
        index: usize,
    ) -> Result<Option<ElementHandle>, AutomationError> {
        if self
            .misses
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Ok(None);
        }
        let key = (
            parent.map(|handle| handle.0.clone()).unwrap_or_default(),
            tag.to_string(),
            index,
        );
        Ok(self.edges.get(&key).map(|handle| ElementHandle(handle.clone())))
    }
}

fn locator(steps: &[(&str, usize)]) -> ResolvedLocator {
    ResolvedLocator {
        snapshot: SnapshotId("snap".into()),
        node: NodeId::new(0, 1),
        steps: steps
            .iter()
            .map(|(tag, index)| PathStep::new(*tag, *index))
            .collect(),
    }
}

fn proposal(method: ActionMethod, arguments: &[&str]) -> ActionProposal {
    ActionProposal {
        target_node_id: NodeId::new(0, 1),
        description: String::new(),
        method,
        arguments: arguments.iter().map(|arg| arg.to_string()).collect(),
    }
}

fn fast_policy() -> ExecutorPolicy {
    ExecutorPolicy {
        keystroke_delay_ms: 1..=2,
        actionable_poll: Duration::from_millis(5),
        resolve_retry_wait: Duration::from_millis(5),
        ..ExecutorPolicy::default()
    }
}

const FORM_PATH: &[(&str, usize)] = &[("html", 0), ("body", 0), ("input", 0)];

#[tokio::test]
async fn type_dispatches_one_stroke_per_character() {
    let driver = FakeDriver::default();
    let dom = FakeDom::with_path(FORM_PATH);
    let policy = fast_policy();
    let ctx = ExecCtx::with_timeout(Duration::from_secs(5));

    let report = execute(
        &ctx,
        &proposal(ActionMethod::Type, &["Hello"]),
        &locator(FORM_PATH),
        RuntimeDeps {
            driver: &driver,
            dom: &dom,
            target: None,
            policy: &policy,
        },
    )
    .await;

    assert!(report.ok, "unexpected failure: {:?}", report.error);
    assert_eq!(report.state, ActionState::Succeeded);
    assert_eq!(report.keystrokes, 5);
    assert_eq!(report.resolved_path.as_deref(), Some("/html[1]/body[1]/input[1]"));

    let calls = driver.calls();
    let strokes: Vec<_> = calls.iter().filter(|c| c.starts_with("stroke")).collect();
    assert_eq!(strokes.len(), 5);
    assert!(strokes[0].ends_with("H"));
    assert!(calls.iter().any(|c| c.starts_with("clear")));
}

#[tokio::test]
async fn fill_clears_then_sets_in_one_call() {
    let driver = FakeDriver::default();
    let dom = FakeDom::with_path(FORM_PATH);
    let policy = fast_policy();
    let ctx = ExecCtx::with_timeout(Duration::from_secs(5));

    let report = execute(
        &ctx,
        &proposal(ActionMethod::Fill, &["hello@example.com"]),
        &locator(FORM_PATH),
        RuntimeDeps {
            driver: &driver,
            dom: &dom,
            target: None,
            policy: &policy,
        },
    )
    .await;

    assert!(report.ok);
    let calls = driver.calls();
    let clear_at = calls.iter().position(|c| c.starts_with("clear")).unwrap();
    let set_at = calls.iter().position(|c| c.starts_with("set")).unwrap();
    assert!(clear_at < set_at);
    assert!(calls[set_at].ends_with("hello@example.com"));
    assert!(!calls.iter().any(|c| c.starts_with("stroke")));
}

#[tokio::test]
async fn native_select_matches_value_when_label_misses() {
    let select_path: &[(&str, usize)] = &[("html", 0), ("body", 0), ("select", 0)];
    let driver = FakeDriver {
        options: vec![
            OptionEntry {
                label: "United States".into(),
                value: "us".into(),
            },
            OptionEntry {
                label: "Canada".into(),
                value: "ca".into(),
            },
        ],
        ..FakeDriver::default()
    };
    let dom = FakeDom::with_path(select_path);
    let policy = fast_policy();
    let ctx = ExecCtx::with_timeout(Duration::from_secs(5));

    let report = execute(
        &ctx,
        &proposal(ActionMethod::SelectOption, &["ca"]),
        &locator(select_path),
        RuntimeDeps {
            driver: &driver,
            dom: &dom,
            target: None,
            policy: &policy,
        },
    )
    .await;

    assert!(report.ok);
    assert!(driver
        .calls()
        .iter()
        .any(|c| c.starts_with("select") && c.ends_with("Canada")));
}

#[tokio::test]
async fn native_select_reports_available_options_on_miss() {
    let select_path: &[(&str, usize)] = &[("html", 0), ("body", 0), ("select", 0)];
    let driver = FakeDriver {
        options: vec![OptionEntry {
            label: "Small".into(),
            value: "s".into(),
        }],
        ..FakeDriver::default()
    };
    let dom = FakeDom::with_path(select_path);
    let policy = fast_policy();
    let ctx = ExecCtx::with_timeout(Duration::from_secs(5));

    let report = execute(
        &ctx,
        &proposal(ActionMethod::SelectOption, &["Gigantic"]),
        &locator(select_path),
        RuntimeDeps {
            driver: &driver,
            dom: &dom,
            target: None,
            policy: &policy,
        },
    )
    .await;

    assert_eq!(report.state, ActionState::Failed(FailCause::OptionNotFound));
    match report.error {
        Some(AutomationError::OptionNotFound {
            requested,
            available,
        }) => {
            assert_eq!(requested, "Gigantic");
            assert_eq!(available, vec!["Small".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn custom_dropdown_opens_then_clicks_matching_text() {
    let div_path: &[(&str, usize)] = &[("html", 0), ("body", 0), ("div", 0)];
    let driver = FakeDriver {
        visible_texts: HashMap::from([(
            "Express shipping".to_string(),
            ElementHandle("option-2".into()),
        )]),
        ..FakeDriver::default()
    };
    let dom = FakeDom::with_path(div_path);
    let policy = fast_policy();
    let ctx = ExecCtx::with_timeout(Duration::from_secs(5));

    let report = execute(
        &ctx,
        &proposal(ActionMethod::SelectOption, &["Express shipping"]),
        &locator(div_path),
        RuntimeDeps {
            driver: &driver,
            dom: &dom,
            target: None,
            policy: &policy,
        },
    )
    .await;

    assert!(report.ok);
    let calls = driver.calls();
    let open_at = calls.iter().position(|c| c.starts_with("click /")).unwrap();
    let find_at = calls.iter().position(|c| c.starts_with("find")).unwrap();
    let pick_at = calls
        .iter()
        .position(|c| c == "click option-2")
        .unwrap();
    assert!(open_at < find_at && find_at < pick_at);
}

#[tokio::test]
async fn scroll_percentage_lands_on_fraction_of_page_height() {
    let driver = FakeDriver {
        page_height: 4000.0,
        ..FakeDriver::default()
    };
    let dom = FakeDom::with_path(FORM_PATH);
    let policy = fast_policy();
    let ctx = ExecCtx::with_timeout(Duration::from_secs(5));

    let report = execute(
        &ctx,
        &proposal(ActionMethod::Scroll, &["50%"]),
        &locator(FORM_PATH),
        RuntimeDeps {
            driver: &driver,
            dom: &dom,
            target: None,
            policy: &policy,
        },
    )
    .await;

    assert!(report.ok);
    assert!(driver.calls().contains(&"scroll-to 2000".to_string()));
}

#[tokio::test]
async fn press_with_unknown_key_is_an_invalid_proposal() {
    let driver = FakeDriver::default();
    let dom = FakeDom::with_path(FORM_PATH);
    let policy = fast_policy();
    let ctx = ExecCtx::with_timeout(Duration::from_secs(5));

    let report = execute(
        &ctx,
        &proposal(ActionMethod::Press, &["Hyperdrive"]),
        &locator(FORM_PATH),
        RuntimeDeps {
            driver: &driver,
            dom: &dom,
            target: None,
            policy: &policy,
        },
    )
    .await;

    assert_eq!(
        report.state,
        ActionState::Failed(FailCause::InvalidProposal)
    );
    assert!(driver.calls().is_empty(), "no driver call should be made");
}

#[tokio::test]
async fn stale_locator_fails_after_exactly_one_retry() {
    let driver = FakeDriver::default();
    // A document that never contains the input path.
    let dom = FakeDom::with_path(&[("html", 0), ("body", 0)]);
    let policy = fast_policy();
    let ctx = ExecCtx::with_timeout(Duration::from_secs(5));

    let report = execute(
        &ctx,
        &proposal(ActionMethod::Click, &[]),
        &locator(FORM_PATH),
        RuntimeDeps {
            driver: &driver,
            dom: &dom,
            target: None,
            policy: &policy,
        },
    )
    .await;

    assert_eq!(report.state, ActionState::Failed(FailCause::Stale));
    assert!(report.resolve_retried);
    assert!(driver.calls().is_empty());
}

#[tokio::test]
async fn resolve_retry_recovers_late_painting_element() {
    let driver = FakeDriver::default();
    let dom = FakeDom::with_path(FORM_PATH);
    dom.misses.store(1, Ordering::SeqCst);
    let policy = fast_policy();
    let ctx = ExecCtx::with_timeout(Duration::from_secs(5));

    let report = execute(
        &ctx,
        &proposal(ActionMethod::Click, &[]),
        &locator(FORM_PATH),
        RuntimeDeps {
            driver: &driver,
            dom: &dom,
            target: None,
            policy: &policy,
        },
    )
    .await;

    assert!(report.ok, "unexpected failure: {:?}", report.error);
    assert!(report.resolve_retried);
    assert!(driver.calls().iter().any(|c| c.starts_with("click")));
}

#[tokio::test]
async fn actionability_wait_times_out_against_detached_element() {
    let driver = FakeDriver {
        never_actionable: true,
        ..FakeDriver::default()
    };
    let dom = FakeDom::with_path(FORM_PATH);
    let policy = fast_policy();
    let ctx = ExecCtx::with_timeout(Duration::from_millis(60));

    let report = execute(
        &ctx,
        &proposal(ActionMethod::Click, &[]),
        &locator(FORM_PATH),
        RuntimeDeps {
            driver: &driver,
            dom: &dom,
            target: None,
            policy: &policy,
        },
    )
    .await;

    assert_eq!(report.state, ActionState::Failed(FailCause::Timeout));
    assert!(!driver.calls().iter().any(|c| c.starts_with("click")));
}

#[tokio::test]
async fn semantic_scroll_without_resolver_is_a_driver_error() {
    let driver = FakeDriver::default();
    let dom = FakeDom::with_path(FORM_PATH);
    let policy = fast_policy();
    let ctx = ExecCtx::with_timeout(Duration::from_secs(5));

    let report = execute(
        &ctx,
        &proposal(ActionMethod::Scroll, &["footer"]),
        &locator(FORM_PATH),
        RuntimeDeps {
            driver: &driver,
            dom: &dom,
            target: None,
            policy: &policy,
        },
    )
    .await;

    assert_eq!(report.state, ActionState::Failed(FailCause::Driver));
}
