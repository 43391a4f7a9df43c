use super::node::TreeNode;

/// Recompute directory sizes and progress, bottom-up.
///
/// Directory progress is the mean over all files beneath it, so a directory
/// holding many small files is not dominated by one large file. Empty
/// directories keep their own values and count as one file.
pub fn aggregate(forest: &mut [TreeNode]) {
    for node in forest {
        aggregate_node(node);
    }
}

/// Returns `(size, leaf_count)` for `node`.
fn aggregate_node(node: &mut TreeNode) -> (u64, usize) {
    let children = match node.children.as_mut() {
        Some(children) if !children.is_empty() => children,
        _ => return (node.record.size, 1),
    };

    let mut size = 0u64;
    let mut weighted = 0.0f64;
    let mut leaves = 0usize;
    for child in children.iter_mut() {
        let (child_size, child_leaves) = aggregate_node(child);
        size = size.saturating_add(child_size);
        weighted += child.record.progress * child_leaves as f64;
        leaves += child_leaves;
    }

    node.record.size = size;
    node.record.progress = weighted / leaves as f64;
    (size, leaves)
}
