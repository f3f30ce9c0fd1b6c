//! Edit session: select a node, stage edits in a buffer, then commit or
//! cancel.
//!
//! ```text
//! Idle --select--> Selected --edit--> Editing
//!   ^                 |                  |
//!   +---commit/cancel-+------------------+
//! ```
//!
//! The buffer never touches the tree until commit. The session holds the
//! selected node's id, not the node, so it must be reconciled against every
//! new snapshot: a selection whose node is gone falls back to `Idle`.

use std::sync::Arc;

use tracing::debug;

use crate::domain::node::{NodeId, NodePatch, OrgNode, Snapshot};
use crate::domain::tree;

/// Staged copy of a node's editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub stats: Option<String>,
}

impl EditBuffer {
    pub fn from_node(node: &OrgNode) -> Self {
        Self {
            title: node.title.clone(),
            description: node.description.clone(),
            image_url: node.image_url.clone(),
            stats: node.stats.clone(),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// External URL or `data:` URL of an uploaded image; `None` removes it.
    pub fn set_image_url(&mut self, image_url: Option<String>) {
        self.image_url = image_url;
    }

    pub fn set_stats(&mut self, stats: Option<String>) {
        self.stats = stats;
    }

    /// Patch writing every buffered field back.
    pub fn to_patch(&self) -> NodePatch {
        NodePatch {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            image_url: Some(self.image_url.clone()),
            stats: Some(self.stats.clone()),
            expanded: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Selected,
    Editing,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum SessionState {
    #[default]
    Idle,
    Selected {
        node_id: NodeId,
        buffer: EditBuffer,
    },
    Editing {
        node_id: NodeId,
        buffer: EditBuffer,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    state: SessionState,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        match self.state {
            SessionState::Idle => SessionPhase::Idle,
            SessionState::Selected { .. } => SessionPhase::Selected,
            SessionState::Editing { .. } => SessionPhase::Editing,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase() == SessionPhase::Idle
    }

    pub fn selected_id(&self) -> Option<&NodeId> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Selected { node_id, .. } | SessionState::Editing { node_id, .. } => {
                Some(node_id)
            }
        }
    }

    pub fn buffer(&self) -> Option<&EditBuffer> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Selected { buffer, .. } | SessionState::Editing { buffer, .. } => {
                Some(buffer)
            }
        }
    }

    /// Select `node`, replacing any previous selection and its staged edits.
    pub fn select(&mut self, node: &OrgNode) {
        debug!("select: {}", node.id);
        self.state = SessionState::Selected {
            node_id: node.id.clone(),
            buffer: EditBuffer::from_node(node),
        };
    }

    /// Apply `f` to the buffer. Returns `false` when nothing is selected.
    pub fn edit(&mut self, f: impl FnOnce(&mut EditBuffer)) -> bool {
        match std::mem::take(&mut self.state) {
            SessionState::Idle => false,
            SessionState::Selected {
                node_id,
                mut buffer,
            }
            | SessionState::Editing {
                node_id,
                mut buffer,
            } => {
                f(&mut buffer);
                self.state = SessionState::Editing { node_id, buffer };
                true
            }
        }
    }

    /// Write the buffer into `snapshot` and return to `Idle`.
    ///
    /// When the selected node no longer exists in `snapshot` the result is
    /// `snapshot` itself; a commit never re-creates a deleted node.
    pub fn commit(&mut self, snapshot: &Snapshot) -> Snapshot {
        match std::mem::take(&mut self.state) {
            SessionState::Idle => Arc::clone(snapshot),
            SessionState::Selected { node_id, buffer }
            | SessionState::Editing { node_id, buffer } => {
                debug!("commit: {}", node_id);
                tree::update(snapshot, node_id.as_str(), &buffer.to_patch())
            }
        }
    }

    /// Drop the buffer and return to `Idle`.
    pub fn cancel(&mut self) {
        if let Some(id) = self.selected_id() {
            debug!("cancel: {}", id);
        }
        self.state = SessionState::Idle;
    }

    /// Clear a selection whose node is missing from `snapshot`.
    /// Returns `true` when the selection was cleared.
    pub fn reconcile(&mut self, snapshot: &OrgNode) -> bool {
        let dangling = self
            .selected_id()
            .is_some_and(|id| !tree::contains(snapshot, id.as_str()));
        if dangling {
            debug!("reconcile: selected node is gone, back to idle");
            self.state = SessionState::Idle;
        }
        dangling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> Snapshot {
        OrgNode::new("r", "Root")
            .with_child(OrgNode::new("c", "Child").with_stats("3"))
            .into_snapshot()
    }

    #[test]
    fn given_selection_when_editing_then_phase_moves_to_editing() {
        let snapshot = chart();
        let mut session = EditSession::new();
        session.select(tree::find(&snapshot, "c").unwrap());
        assert_eq!(session.phase(), SessionPhase::Selected);

        assert!(session.edit(|b| b.set_title("Sales")));
        assert_eq!(session.phase(), SessionPhase::Editing);
        assert_eq!(session.buffer().map(|b| b.title.as_str()), Some("Sales"));
    }

    #[test]
    fn given_idle_when_editing_then_nothing_happens() {
        let mut session = EditSession::new();
        assert!(!session.edit(|b| b.set_title("x")));
        assert!(session.is_idle());
    }

    #[test]
    fn given_staged_edit_when_cancelled_then_tree_is_unchanged() {
        let snapshot = chart();
        let mut session = EditSession::new();
        session.select(tree::find(&snapshot, "c").unwrap());
        session.edit(|b| b.set_stats(None));
        session.cancel();

        let after = session.commit(&snapshot);
        assert!(Arc::ptr_eq(&snapshot, &after));
        assert!(session.is_idle());
    }

    #[test]
    fn given_staged_edit_when_committed_then_fields_are_written() {
        let snapshot = chart();
        let mut session = EditSession::new();
        session.select(tree::find(&snapshot, "c").unwrap());
        session.edit(|b| {
            b.set_title("Sales");
            b.set_image_url(Some("https://example.com/a.png".into()));
        });

        let after = session.commit(&snapshot);
        let node = tree::find(&after, "c").unwrap();
        assert_eq!(node.title, "Sales");
        assert_eq!(node.image_url.as_deref(), Some("https://example.com/a.png"));
        assert_eq!(node.stats.as_deref(), Some("3"));
        assert!(session.is_idle());
    }
}
