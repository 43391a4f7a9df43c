use std::collections::HashMap;

use tracing::warn;

use crate::transmission_client::FileRecord;

use super::aggregate::aggregate;
use super::node::TreeNode;

/// Build a forest from flat file records, splitting paths on `/`.
///
/// Records are processed in byte-lexicographic path order. A record whose
/// path matches an existing node replaces it as a file; a record that would
/// sit beneath a file is dropped.
pub fn build_tree(records: &[FileRecord]) -> Vec<TreeNode> {
    let mut sorted: Vec<&FileRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    let mut arena: Vec<Option<TreeNode>> = Vec::new();
    let mut child_indices: Vec<Option<Vec<usize>>> = Vec::new();
    let mut by_path: HashMap<String, usize> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();

    for record in sorted {
        let segments: Vec<&str> = record.path.split('/').collect();
        let mut path = String::with_capacity(record.path.len());

        for (depth, segment) in segments.iter().enumerate() {
            let is_last = depth + 1 == segments.len();
            let parent = (depth > 0).then(|| path.clone());
            if depth > 0 {
                path.push('/');
            }
            path.push_str(segment);

            if let Some(&index) = by_path.get(&path) {
                if is_last {
                    arena[index] = Some(TreeNode::leaf(record.clone()));
                    child_indices[index] = None;
                }
                continue;
            }

            let index = arena.len();
            if is_last {
                arena.push(Some(TreeNode::leaf(record.clone())));
                child_indices.push(None);
            } else {
                arena.push(Some(TreeNode::directory(&path)));
                child_indices.push(Some(Vec::new()));
            }
            by_path.insert(path.clone(), index);

            match parent.and_then(|p| by_path.get(&p).copied()) {
                None => roots.push(index),
                Some(parent_index) => match child_indices[parent_index].as_mut() {
                    Some(children) => children.push(index),
                    None => warn!(path = %path, "Parent is a file; dropping node"),
                },
            }
        }
    }

    let mut forest: Vec<TreeNode> = roots
        .into_iter()
        .filter_map(|index| materialize(index, &mut arena, &child_indices))
        .collect();
    aggregate(&mut forest);
    forest
}

fn materialize(
    index: usize,
    arena: &mut [Option<TreeNode>],
    child_indices: &[Option<Vec<usize>>],
) -> Option<TreeNode> {
    let mut node = arena[index].take()?;
    if let Some(indices) = &child_indices[index] {
        node.children = Some(
            indices
                .iter()
                .filter_map(|child| materialize(*child, arena, child_indices))
                .collect(),
        );
    }
    Some(node)
}
