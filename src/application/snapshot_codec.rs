//! Snapshot <-> persisted JSON form.
//!
//! Both directions are pure. Decoding validates the whole tree before
//! anything is handed back, so a failed import never yields a partial tree.

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{tree, validate_tree, OrgNode, Snapshot};

/// Pretty-printed JSON with two-space indentation.
pub fn encode(root: &OrgNode) -> ApplicationResult<String> {
    serde_json::to_string_pretty(root).map_err(|e| ApplicationError::OperationFailed {
        context: format!("serialize chart {}", root.id),
        source: Box::new(e),
    })
}

/// Parse and validate a persisted chart. `source_name` only labels errors.
pub fn decode(source_name: &str, text: &str) -> ApplicationResult<Snapshot> {
    let root: OrgNode = serde_json::from_str(text)
        .map_err(|e| ApplicationError::import_parse(source_name, e.to_string()))?;
    validate_tree(&root).map_err(|e| ApplicationError::import_parse(source_name, e.to_string()))?;
    debug!(
        "decode: {} nodes from {}",
        tree::node_count(&root),
        source_name
    );
    Ok(root.into_snapshot())
}

/// Like [`decode`] for raw bytes; rejects invalid UTF-8.
pub fn decode_bytes(source_name: &str, bytes: &[u8]) -> ApplicationResult<Snapshot> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ApplicationError::import_parse(source_name, e.to_string()))?;
    decode(source_name, text)
}
