//! Live-document query boundary

use async_trait::async_trait;
use pagepilot_core_types::AutomationError;

use crate::types::ElementHandle;

/// Driver-side view of the live document, the only thing re-resolution
/// needs: step from a parent element to its `index`-th child sharing `tag`.
/// `parent = None` addresses the document root.
#[async_trait]
pub trait DomPort: Send + Sync {
    async fn query_step(
        &self,
        parent: Option<&ElementHandle>,
        tag: &str,
        index: usize,
    ) -> Result<Option<ElementHandle>, AutomationError>;
}
