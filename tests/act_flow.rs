//! End-to-end session flows over the mock interpreter and a fake driver.

use std::sync::{Arc, Mutex};

use action_executor::{Actionability, ActionState, DriverPort, FailCause, OptionEntry};
use action_locator::ElementHandle;
use async_trait::async_trait;
use extraction_schema::{ExtractionSchema, FieldKind, FieldSpec};
use interpreter_bridge::{ActionMethod, MockInterpreter};
use pagepilot_cli::{ActRequest, Session, Settings, SnapshotDom, SnapshotPort};
use pagepilot_core_types::{AutomationError, FrameIndex};
use serde_json::json;
use tree_indexer::{index, AccessibilityNode};

fn message_form() -> AccessibilityNode {
    serde_json::from_value(json!({
        "role": "document", "tag": "html", "children": [
            { "role": "generic", "tag": "body", "children": [
                { "role": "heading", "name": "Welcome", "tag": "h1" },
                { "role": "textbox", "name": "Message", "tag": "input" },
                { "role": "button", "name": "Send", "tag": "button" }
            ]}
        ]
    }))
    .unwrap()
}

struct StaticSnapshot {
    root: AccessibilityNode,
}

#[async_trait]
impl SnapshotPort for StaticSnapshot {
    async fn capture(&self, _frame: FrameIndex) -> Result<AccessibilityNode, AutomationError> {
        Ok(self.root.clone())
    }
}

/// Always-actionable driver that records dispatched keystrokes and clicks.
#[derive(Default)]
struct RecordingDriver {
    strokes: Mutex<Vec<char>>,
    clicks: Mutex<Vec<String>>,
}

#[async_trait]
impl DriverPort for RecordingDriver {
    async fn click(&self, element: &ElementHandle) -> Result<(), AutomationError> {
        self.clicks.lock().unwrap().push(element.0.clone());
        Ok(())
    }

    async fn hover(&self, _element: &ElementHandle) -> Result<(), AutomationError> {
        Ok(())
    }

    async fn clear_value(&self, _element: &ElementHandle) -> Result<(), AutomationError> {
        Ok(())
    }

    async fn set_value(&self, _element: &ElementHandle, _text: &str) -> Result<(), AutomationError> {
        Ok(())
    }

    async fn key_stroke(&self, _element: &ElementHandle, ch: char) -> Result<(), AutomationError> {
        self.strokes.lock().unwrap().push(ch);
        Ok(())
    }

    async fn options_of(
        &self,
        _element: &ElementHandle,
    ) -> Result<Vec<OptionEntry>, AutomationError> {
        Ok(Vec::new())
    }

    async fn select_by_text(
        &self,
        _element: &ElementHandle,
        _text: &str,
    ) -> Result<(), AutomationError> {
        Ok(())
    }

    async fn find_text(&self, _text: &str) -> Result<Option<ElementHandle>, AutomationError> {
        Ok(None)
    }

    async fn key_press(&self, _key: &str) -> Result<(), AutomationError> {
        Ok(())
    }

    async fn page_height(&self) -> Result<f64, AutomationError> {
        Ok(2000.0)
    }

    async fn scroll_to_offset(&self, _offset: f64) -> Result<(), AutomationError> {
        Ok(())
    }

    async fn scroll_into_view(&self, _element: &ElementHandle) -> Result<(), AutomationError> {
        Ok(())
    }

    async fn probe(&self, _element: &ElementHandle) -> Result<Actionability, AutomationError> {
        Ok(Actionability {
            attached: true,
            visible: true,
            enabled: true,
            position: (5.0, 5.0),
        })
    }
}

fn session_over(
    interpreter: Arc<MockInterpreter>,
    driver: Arc<RecordingDriver>,
    settings: Settings,
) -> Session {
    let root = message_form();
    let snapshot = index(&root, 0).unwrap();
    Session::new(
        interpreter,
        driver,
        Arc::new(SnapshotDom::new(snapshot)),
        Arc::new(StaticSnapshot { root }),
        settings,
    )
}

fn fast_settings() -> Settings {
    let mut settings = Settings::default();
    settings.executor.keystroke_delay_min_ms = 1;
    settings.executor.keystroke_delay_max_ms = 2;
    settings.executor.actionable_poll_ms = 5;
    settings
}

#[tokio::test]
async fn type_instruction_runs_end_to_end() {
    let driver = Arc::new(RecordingDriver::default());
    let session = session_over(
        Arc::new(MockInterpreter::new()),
        driver.clone(),
        Settings::default(),
    );

    let outcome = session
        .act(ActRequest::Instruction(
            "Type 'Hello' in the message box".into(),
        ))
        .await
        .unwrap();

    assert!(outcome.report.ok, "failed: {:?}", outcome.report.error);
    assert_eq!(outcome.proposal.method, ActionMethod::Type);
    assert_eq!(outcome.proposal.arguments, vec!["Hello".to_string()]);
    assert_eq!(outcome.report.keystrokes, 5);
    assert_eq!(
        outcome.report.resolved_path.as_deref(),
        Some("/html[1]/body[1]/input[1]")
    );
    // Five delays drawn from the default 25-75ms bound.
    assert!(outcome.report.latency_ms >= 125);
    assert_eq!(*driver.strokes.lock().unwrap(), vec!['H', 'e', 'l', 'l', 'o']);
}

#[tokio::test]
async fn repeated_instruction_never_reinterprets() {
    let mock = Arc::new(MockInterpreter::new());
    let driver = Arc::new(RecordingDriver::default());
    let session = session_over(mock.clone(), driver, fast_settings());

    let first = session
        .act(ActRequest::Instruction("Click the Send button".into()))
        .await
        .unwrap();
    let second = session
        .act(ActRequest::Instruction("Click the Send button".into()))
        .await
        .unwrap();

    assert_eq!(mock.propose_calls(), 1);
    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(first.proposal.method, second.proposal.method);
    assert_eq!(first.proposal.arguments, second.proposal.arguments);
    assert!(second.report.ok);
}

#[tokio::test]
async fn cached_proposal_skips_the_interpreter() {
    let mock = Arc::new(MockInterpreter::new());
    let driver = Arc::new(RecordingDriver::default());
    let session = session_over(mock.clone(), driver.clone(), fast_settings());

    let proposals = session.observe("Click the Send button").await.unwrap();
    assert_eq!(proposals.len(), 1);
    assert_eq!(proposals[0].method, ActionMethod::Click);
    assert!(proposals[0].description.contains("Send"));
    assert_eq!(mock.propose_calls(), 1);

    let outcome = session
        .act(ActRequest::Cached(proposals[0].clone()))
        .await
        .unwrap();

    assert_eq!(mock.propose_calls(), 1, "act must not reinterpret");
    assert!(outcome.from_cache);
    assert!(outcome.report.ok);
    assert_eq!(driver.clicks.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn configured_timeout_bounds_the_action() {
    let mut settings = fast_settings();
    settings.executor.action_timeout_ms = 0;
    let driver = Arc::new(RecordingDriver::default());
    let session = session_over(Arc::new(MockInterpreter::new()), driver.clone(), settings);

    let outcome = session
        .act(ActRequest::Instruction("Click the Send button".into()))
        .await
        .unwrap();

    assert_eq!(outcome.report.state, ActionState::Failed(FailCause::Timeout));
    assert!(driver.clicks.lock().unwrap().is_empty());
}

#[tokio::test]
async fn extraction_is_all_or_nothing() {
    let mock = Arc::new(MockInterpreter::new());
    let driver = Arc::new(RecordingDriver::default());
    let session = session_over(mock, driver, fast_settings());

    // The mock echoes {"instruction": ...}; a matching schema passes.
    let matching =
        ExtractionSchema::new().field("instruction", FieldSpec::new(FieldKind::String));
    let value = session.extract("read the page title", &matching).await.unwrap();
    assert_eq!(value["instruction"], "read the page title");

    // A schema expecting a different shape fails with SchemaMismatch.
    let mismatched = ExtractionSchema::new().field("price", FieldSpec::new(FieldKind::Number));
    let err = session
        .extract("read the price", &mismatched)
        .await
        .unwrap_err();
    assert!(matches!(err, AutomationError::SchemaMismatch { .. }));
}
