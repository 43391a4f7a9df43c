//! Hierarchical file selection built from a torrent's flat file list.

mod aggregate;
mod builder;
mod node;
mod propagate;
mod view;

pub use aggregate::aggregate;
pub use builder::build_tree;
pub use node::{find_node, TreeNode};
pub use propagate::{all_file_ids, set_all, set_wanted, toggle_target, tri_state, TriState};
pub use view::FileTreeView;
