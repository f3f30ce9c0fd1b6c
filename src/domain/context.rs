//! The chart context: current snapshot, view state and edit session.
//!
//! All user interactions go through a `ChartContext` passed explicitly to
//! the operations. Mutations replace the snapshot wholesale, so readers
//! holding an older snapshot are never disturbed.

use std::sync::Arc;

use tracing::debug;

use crate::domain::error::DomainResult;
use crate::domain::node::{NodeId, NodePatch, NodeTemplate, OrgNode, Snapshot};
use crate::domain::session::EditSession;
use crate::domain::tree;
use crate::domain::view::ViewState;

#[derive(Debug, Clone)]
pub struct ChartContext {
    snapshot: Snapshot,
    pub view: ViewState,
    pub session: EditSession,
    template: NodeTemplate,
}

impl Default for ChartContext {
    fn default() -> Self {
        Self::new(NodeTemplate::default(), ViewState::default())
    }
}

impl ChartContext {
    /// Context holding a fresh root built from `template`.
    pub fn new(template: NodeTemplate, view: ViewState) -> Self {
        let root = template.root(NodeId::generate()).into_snapshot();
        Self::with_snapshot(root, template, view)
    }

    pub fn with_snapshot(snapshot: Snapshot, template: NodeTemplate, view: ViewState) -> Self {
        Self {
            snapshot,
            view,
            session: EditSession::new(),
            template,
        }
    }

    /// The current snapshot. Cloning it is cheap and the clone stays valid
    /// while the context moves on.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn root_id(&self) -> &NodeId {
        &self.snapshot.id
    }

    pub fn template(&self) -> &NodeTemplate {
        &self.template
    }

    pub fn find(&self, id: &str) -> Option<&OrgNode> {
        tree::find(&self.snapshot, id)
    }

    /// Append a placeholder child under `parent_id` and return its id.
    /// `None` (and no change) when `parent_id` is absent.
    pub fn add_child(&mut self, parent_id: &str) -> Option<NodeId> {
        let id = tree::fresh_id(&self.snapshot);
        let child = self.template.child(id.clone());
        match tree::try_add_child_node(&self.snapshot, parent_id, child) {
            Ok(next) => {
                self.snapshot = next;
                Some(id)
            }
            Err(e) => {
                debug!("add_child: {}", e);
                None
            }
        }
    }

    pub fn update(&mut self, id: &str, patch: &NodePatch) {
        self.snapshot = tree::update(&self.snapshot, id, patch);
    }

    /// Delete the subtree at `id` and drop a selection that pointed into it.
    pub fn delete(&mut self, id: &str) -> DomainResult<()> {
        self.snapshot = tree::try_delete(&self.snapshot, id)?;
        self.session.reconcile(&self.snapshot);
        Ok(())
    }

    pub fn toggle_expanded(&mut self, id: &str) {
        self.snapshot = tree::toggle_expanded(&self.snapshot, id);
    }

    pub fn set_all_expanded(&mut self, expanded: bool) {
        self.snapshot = tree::set_all_expanded(&self.snapshot, expanded);
    }

    /// Start editing `id`. Returns `false` when the node does not exist.
    pub fn select(&mut self, id: &str) -> bool {
        match tree::find(&self.snapshot, id) {
            Some(node) => {
                self.session.select(node);
                true
            }
            None => false,
        }
    }

    pub fn commit(&mut self) {
        self.snapshot = self.session.commit(&self.snapshot);
    }

    pub fn cancel(&mut self) {
        self.session.cancel();
    }

    /// Replace the whole tree (import). Abandons any edit in progress; the
    /// last replacement wins.
    pub fn replace_snapshot(&mut self, snapshot: Snapshot) {
        debug!(
            "replace_snapshot: {} nodes, root {}",
            tree::node_count(&snapshot),
            snapshot.id
        );
        self.session.cancel();
        self.snapshot = snapshot;
    }

    /// Whether the context still holds exactly `snapshot`.
    pub fn is_current(&self, snapshot: &Snapshot) -> bool {
        Arc::ptr_eq(&self.snapshot, snapshot)
    }
}
