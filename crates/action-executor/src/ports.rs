//! Primitive automation driver boundary

use action_locator::ElementHandle;
use async_trait::async_trait;
use pagepilot_core_types::AutomationError;

/// Point-in-time actionability probe of a live element.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Actionability {
    pub attached: bool,
    pub visible: bool,
    pub enabled: bool,
    /// Viewport position of the element's top-left corner; compared across
    /// two consecutive probes to rule out mid-animation targets.
    pub position: (f64, f64),
}

impl Actionability {
    pub fn interactable(&self) -> bool {
        self.attached && self.visible && self.enabled
    }
}

/// One entry of a native select's option set.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OptionEntry {
    pub label: String,
    pub value: String,
}

/// Primitive operations of the underlying automation driver. Each call
/// returns success or a driver-level error; orchestration, waiting policy,
/// and retries live above this boundary.
#[async_trait]
pub trait DriverPort: Send + Sync {
    async fn click(&self, element: &ElementHandle) -> Result<(), AutomationError>;

    async fn hover(&self, element: &ElementHandle) -> Result<(), AutomationError>;

    /// Clear existing content of an editable element.
    async fn clear_value(&self, element: &ElementHandle) -> Result<(), AutomationError>;

    /// Replace content in a single primitive call (no per-character events).
    async fn set_value(&self, element: &ElementHandle, text: &str) -> Result<(), AutomationError>;

    /// Dispatch one character as a real key stroke.
    async fn key_stroke(&self, element: &ElementHandle, ch: char) -> Result<(), AutomationError>;

    /// Option set of a native select element.
    async fn options_of(&self, element: &ElementHandle) -> Result<Vec<OptionEntry>, AutomationError>;

    /// Native selection by visible option text.
    async fn select_by_text(&self, element: &ElementHandle, text: &str) -> Result<(), AutomationError>;

    /// Locate a visible element by its text content, used for options inside
    /// opened custom dropdowns.
    async fn find_text(&self, text: &str) -> Result<Option<ElementHandle>, AutomationError>;

    async fn key_press(&self, key: &str) -> Result<(), AutomationError>;

    async fn page_height(&self) -> Result<f64, AutomationError>;

    /// Scroll the main viewport to an absolute vertical offset.
    async fn scroll_to_offset(&self, offset: f64) -> Result<(), AutomationError>;

    async fn scroll_into_view(&self, element: &ElementHandle) -> Result<(), AutomationError>;

    /// Point-in-time actionability probe; the bounded wait loop lives in the
    /// executor so its stability policy stays testable without a browser.
    async fn probe(&self, element: &ElementHandle) -> Result<Actionability, AutomationError>;
}

/// Resolution of a semantic scroll label ("footer", "comments") back through
/// the indexer/resolver pipeline. Wired by the session layer.
#[async_trait]
pub trait TargetPort: Send + Sync {
    async fn resolve_labeled(&self, label: &str) -> Result<ElementHandle, AutomationError>;
}
