use serde::Serialize;
use tracing::error;

use crate::types::ClientError;

use super::node::{find_node, find_node_mut, TreeNode};

/// Aggregate selection indicator for a whole forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriState {
    Checked,
    Unchecked,
    Indeterminate,
}

fn sorted_unique(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn compare_ids(scope: &str, actual: Vec<i64>, file_ids: &[i64]) -> Result<(), ClientError> {
    let actual = sorted_unique(actual);
    let expected = sorted_unique(file_ids.to_vec());
    if actual != expected {
        error!(
            scope,
            expected = ?expected,
            actual = ?actual,
            "File tree does not match file list"
        );
        return Err(ClientError::Desync { expected, actual });
    }
    Ok(())
}

/// Compare the ids found beneath `node` with an independently derived list.
pub fn check_consistency(node: &TreeNode, file_ids: &[i64]) -> Result<(), ClientError> {
    compare_ids(node.path(), node.file_ids(), file_ids)
}

/// Same check over every root of the forest.
pub fn check_forest_consistency(forest: &[TreeNode], file_ids: &[i64]) -> Result<(), ClientError> {
    compare_ids("<all>", all_file_ids(forest), file_ids)
}

/// Set `wanted` on the node at `path` and, for directories, everything below.
///
/// Nothing changes if the path is unknown or `file_ids` disagrees with the
/// ids found in the subtree.
pub fn set_wanted(
    forest: &mut [TreeNode],
    path: &str,
    wanted: bool,
    file_ids: &[i64],
) -> Result<(), ClientError> {
    let node = find_node(forest, path).ok_or_else(|| ClientError::UnknownPath(path.to_string()))?;
    check_consistency(node, file_ids)?;

    if let Some(node) = find_node_mut(forest, path) {
        node.apply_recursive(&|n: &mut TreeNode| n.record.wanted = wanted);
    }
    Ok(())
}

pub fn set_all(forest: &mut [TreeNode], wanted: bool) {
    for node in forest {
        node.apply_recursive(&|n: &mut TreeNode| n.record.wanted = wanted);
    }
}

pub fn all_file_ids(forest: &[TreeNode]) -> Vec<i64> {
    forest.iter().flat_map(TreeNode::file_ids).collect()
}

pub fn tri_state(forest: &[TreeNode]) -> TriState {
    let mut any_wanted = false;
    let mut any_unwanted = false;
    for node in forest {
        node.for_each_leaf(&mut |leaf| {
            if leaf.record.wanted {
                any_wanted = true;
            } else {
                any_unwanted = true;
            }
        });
    }
    match (any_wanted, any_unwanted) {
        (_, false) => TriState::Checked,
        (false, true) => TriState::Unchecked,
        (true, true) => TriState::Indeterminate,
    }
}

/// Value "select all" applies: a partial selection always selects everything.
pub fn toggle_target(state: TriState) -> bool {
    match state {
        TriState::Checked => false,
        TriState::Unchecked | TriState::Indeterminate => true,
    }
}
