//! Offline driver-side adapters for the CLI.
//!
//! The CLI exercises the full pipeline without a live browser: `SnapshotDom`
//! answers structural path queries from the loaded snapshot, and
//! `LoggingDriver` logs every primitive it would have performed.

use action_executor::{Actionability, DriverPort, OptionEntry};
use action_locator::{DomPort, ElementHandle};
use async_trait::async_trait;
use pagepilot_core_types::AutomationError;
use tracing::info;
use tree_indexer::IndexedSnapshot;

/// `DomPort` over an indexed snapshot. Element handles are arena offsets, so
/// a handle is only meaningful against the snapshot that minted it.
pub struct SnapshotDom {
    snapshot: IndexedSnapshot,
}

impl SnapshotDom {
    pub fn new(snapshot: IndexedSnapshot) -> Self {
        Self { snapshot }
    }

    fn offset_of(&self, handle: &ElementHandle) -> Option<usize> {
        let offset: usize = handle.0.parse().ok()?;
        (offset < self.snapshot.len()).then_some(offset)
    }
}

#[async_trait]
impl DomPort for SnapshotDom {
    async fn query_step(
        &self,
        parent: Option<&ElementHandle>,
        tag: &str,
        index: usize,
    ) -> Result<Option<ElementHandle>, AutomationError> {
        let matched = match parent {
            // The document root is the only top-level element.
            None => (self.snapshot.root().tag == tag && index == 0).then_some(0usize),
            Some(handle) => {
                let Some(offset) = self.offset_of(handle) else {
                    return Ok(None);
                };
                self.snapshot
                    .node_at(offset)
                    .children
                    .iter()
                    .copied()
                    .filter(|child| self.snapshot.node_at(*child).tag == tag)
                    .nth(index)
            }
        };
        Ok(matched.map(|offset| ElementHandle(offset.to_string())))
    }
}

/// No-op `DriverPort` that reports every primitive as performed. Elements are
/// always actionable at a fixed position, so plans run end to end.
#[derive(Debug, Default)]
pub struct LoggingDriver;

#[async_trait]
impl DriverPort for LoggingDriver {
    async fn click(&self, element: &ElementHandle) -> Result<(), AutomationError> {
        info!(element = %element.0, "click");
        Ok(())
    }

    async fn hover(&self, element: &ElementHandle) -> Result<(), AutomationError> {
        info!(element = %element.0, "hover");
        Ok(())
    }

    async fn clear_value(&self, element: &ElementHandle) -> Result<(), AutomationError> {
        info!(element = %element.0, "clear value");
        Ok(())
    }

    async fn set_value(&self, element: &ElementHandle, text: &str) -> Result<(), AutomationError> {
        info!(element = %element.0, text, "set value");
        Ok(())
    }

    async fn key_stroke(&self, element: &ElementHandle, ch: char) -> Result<(), AutomationError> {
        info!(element = %element.0, key = %ch, "key stroke");
        Ok(())
    }

    async fn options_of(
        &self,
        element: &ElementHandle,
    ) -> Result<Vec<OptionEntry>, AutomationError> {
        info!(element = %element.0, "read options");
        Ok(Vec::new())
    }

    async fn select_by_text(
        &self,
        element: &ElementHandle,
        text: &str,
    ) -> Result<(), AutomationError> {
        info!(element = %element.0, text, "select by text");
        Ok(())
    }

    async fn find_text(&self, text: &str) -> Result<Option<ElementHandle>, AutomationError> {
        info!(text, "find by text");
        Ok(None)
    }

    async fn key_press(&self, key: &str) -> Result<(), AutomationError> {
        info!(key, "key press");
        Ok(())
    }

    async fn page_height(&self) -> Result<f64, AutomationError> {
        Ok(2000.0)
    }

    async fn scroll_to_offset(&self, offset: f64) -> Result<(), AutomationError> {
        info!(offset, "scroll to offset");
        Ok(())
    }

    async fn scroll_into_view(&self, element: &ElementHandle) -> Result<(), AutomationError> {
        info!(element = %element.0, "scroll into view");
        Ok(())
    }

    async fn probe(&self, _element: &ElementHandle) -> Result<Actionability, AutomationError> {
        Ok(Actionability {
            attached: true,
            visible: true,
            enabled: true,
            position: (0.0, 0.0),
        })
    }
}
