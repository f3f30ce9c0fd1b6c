//! Well-formedness checks for trees that did not come from the tree
//! operations (imported snapshots).

use itertools::Itertools;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::OrgNode;
use crate::domain::tree;

/// Check that every node has a non-empty id, that ids are unique across
/// the whole tree and that it is at most [`tree::MAX_DEPTH`] levels deep.
/// Reports the first offender in depth-first order.
pub fn validate_tree(root: &OrgNode) -> DomainResult<()> {
    check_ids_present(root, &mut Vec::new())?;

    if tree::depth(root) > tree::MAX_DEPTH {
        return Err(DomainError::TooDeep {
            at: root.id.to_string(),
            max: tree::MAX_DEPTH,
        });
    }

    if let Some(duplicate) = tree::iter(root).map(|node| &node.id).duplicates().next() {
        return Err(DomainError::DuplicateId(duplicate.to_string()));
    }
    Ok(())
}

fn check_ids_present<'a>(node: &'a OrgNode, titles: &mut Vec<&'a str>) -> DomainResult<()> {
    titles.push(node.title.as_str());
    if node.id.as_str().trim().is_empty() {
        return Err(DomainError::EmptyId {
            path: titles.join(" / "),
        });
    }
    for child in &node.children {
        check_ids_present(child, titles)?;
    }
    titles.pop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_unique_ids_then_tree_is_valid() {
        let root = OrgNode::new("r", "Root")
            .with_child(OrgNode::new("a", "A"))
            .with_child(OrgNode::new("b", "B"));
        assert_eq!(validate_tree(&root), Ok(()));
    }

    #[test]
    fn given_duplicate_in_different_branches_then_reports_duplicate() {
        let root = OrgNode::new("r", "Root")
            .with_child(OrgNode::new("a", "A").with_child(OrgNode::new("x", "X1")))
            .with_child(OrgNode::new("x", "X2"));
        assert_eq!(
            validate_tree(&root),
            Err(DomainError::DuplicateId("x".into()))
        );
    }

    #[test]
    fn given_chain_one_level_too_deep_then_reports_too_deep() {
        let mut node = OrgNode::new("n0", "Leaf");
        for level in 1..=tree::MAX_DEPTH {
            node = OrgNode::new(format!("n{level}"), "Unit").with_child(node);
        }
        assert_eq!(tree::depth(&node), tree::MAX_DEPTH + 1);

        assert!(matches!(
            validate_tree(&node),
            Err(DomainError::TooDeep { max, .. }) if max == tree::MAX_DEPTH
        ));
    }

    #[test]
    fn given_blank_id_then_reports_path_of_titles() {
        let root = OrgNode::new("r", "Root").with_child(OrgNode::new(" ", "Sales"));
        assert_eq!(
            validate_tree(&root),
            Err(DomainError::EmptyId {
                path: "Root / Sales".into()
            })
        );
    }
}
