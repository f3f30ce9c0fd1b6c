//! Node entity, partial updates and the placeholder template for new nodes

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One immutable version of the whole tree.
///
/// Children are shared between snapshots where a rewrite did not touch them,
/// so cloning a snapshot is a reference-count bump.
pub type Snapshot = Arc<OrgNode>;

pub const DEFAULT_ROOT_TITLE: &str = "Công Ty ABC";
pub const DEFAULT_ROOT_DESCRIPTION: &str = "Trụ sở chính";
pub const DEFAULT_CHILD_TITLE: &str = "Node mới";
pub const DEFAULT_CHILD_DESCRIPTION: &str = "Mô tả node";

/// Opaque node identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id (uuid v4, simple form).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn default_expanded() -> bool {
    true
}

/// A box in the organization chart.
///
/// `id`, `title` and `children` are required in the persisted form; the
/// remaining fields are optional and round-trip exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgNode {
    pub id: NodeId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// External URL or embedded `data:` blob, opaque to the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default = "default_expanded")]
    pub expanded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<String>,
    pub children: Vec<Snapshot>,
}

impl OrgNode {
    /// Leaf node with only id and title set, expanded.
    pub fn new(id: impl Into<NodeId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            image_url: None,
            expanded: true,
            stats: None,
            children: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_stats(mut self, stats: impl Into<String>) -> Self {
        self.stats = Some(stats.into());
        self
    }

    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn with_child(mut self, child: OrgNode) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Copy of this node with `patch` merged in. Children are kept as-is.
    pub fn patched(&self, patch: &NodePatch) -> Self {
        let mut node = self.clone();
        patch.apply_to(&mut node);
        node
    }

    pub fn into_snapshot(self) -> Snapshot {
        Arc::new(self)
    }
}

impl fmt::Display for OrgNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.id)
    }
}

/// Partial update of a node's data fields.
///
/// `None` leaves a field alone. For the optional fields `Some(None)` clears
/// the value and `Some(Some(v))` sets it. Structure (`id`, `children`) is
/// never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub stats: Option<Option<String>>,
    pub expanded: Option<bool>,
}

impl NodePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    pub fn image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(Some(image_url.into()));
        self
    }

    pub fn clear_image_url(mut self) -> Self {
        self.image_url = Some(None);
        self
    }

    pub fn stats(mut self, stats: impl Into<String>) -> Self {
        self.stats = Some(Some(stats.into()));
        self
    }

    pub fn clear_stats(mut self) -> Self {
        self.stats = Some(None);
        self
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = Some(expanded);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    fn apply_to(&self, node: &mut OrgNode) {
        if let Some(title) = &self.title {
            node.title = title.clone();
        }
        if let Some(description) = &self.description {
            node.description = description.clone();
        }
        if let Some(image_url) = &self.image_url {
            node.image_url = image_url.clone();
        }
        if let Some(stats) = &self.stats {
            node.stats = stats.clone();
        }
        if let Some(expanded) = self.expanded {
            node.expanded = expanded;
        }
    }
}

/// Placeholder content for the root of a new chart and for added children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTemplate {
    pub root_title: String,
    pub root_description: String,
    pub child_title: String,
    pub child_description: String,
}

impl Default for NodeTemplate {
    fn default() -> Self {
        Self {
            root_title: DEFAULT_ROOT_TITLE.into(),
            root_description: DEFAULT_ROOT_DESCRIPTION.into(),
            child_title: DEFAULT_CHILD_TITLE.into(),
            child_description: DEFAULT_CHILD_DESCRIPTION.into(),
        }
    }
}

impl NodeTemplate {
    pub fn root(&self, id: NodeId) -> OrgNode {
        OrgNode {
            description: Some(self.root_description.clone()),
            image_url: Some(String::new()),
            stats: Some(String::new()),
            ..OrgNode::new(id, self.root_title.clone())
        }
    }

    pub fn child(&self, id: NodeId) -> OrgNode {
        OrgNode {
            description: Some(self.child_description.clone()),
            image_url: Some(String::new()),
            stats: Some(String::new()),
            ..OrgNode::new(id, self.child_title.clone())
        }
    }
}
