use serde::Serialize;

use crate::transmission_client::{FileRecord, DIRECTORY_ID};

/// A file or synthetic directory in a torrent's file tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    #[serde(flatten)]
    pub record: FileRecord,
    /// `None` for files; directories always carry a (possibly empty) list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
    pub expanded: bool,
}

impl TreeNode {
    pub fn leaf(record: FileRecord) -> Self {
        Self {
            record,
            children: None,
            expanded: true,
        }
    }

    pub fn directory(path: &str) -> Self {
        Self {
            record: FileRecord::new(DIRECTORY_ID, path, 0, 0.0, true),
            children: Some(Vec::new()),
            expanded: true,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.children.is_some()
    }

    pub fn path(&self) -> &str {
        &self.record.path
    }

    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Whether `path` would live beneath this node.
    fn contains_path(&self, path: &str) -> bool {
        self.is_directory()
            && path
                .strip_prefix(self.path())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        if self.path() == path {
            return Some(self);
        }
        if self.contains_path(path) {
            return find_node(self.children(), path);
        }
        None
    }

    pub fn find_mut(&mut self, path: &str) -> Option<&mut TreeNode> {
        if self.path() == path {
            return Some(self);
        }
        if !self.contains_path(path) {
            return None;
        }
        self.children
            .as_deref_mut()
            .and_then(|children| find_node_mut(children, path))
    }

    pub fn apply_recursive<F>(&mut self, action: &F)
    where
        F: Fn(&mut TreeNode),
    {
        action(self);
        if let Some(children) = self.children.as_mut() {
            for child in children {
                child.apply_recursive(action);
            }
        }
    }

    /// Calls `visit` on every file beneath (or equal to) this node.
    pub fn for_each_leaf<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a TreeNode),
    {
        match &self.children {
            Some(children) => children.iter().for_each(|c| c.for_each_leaf(visit)),
            None => visit(self),
        }
    }

    /// Ids of every real file beneath this node, in tree order.
    pub fn file_ids(&self) -> Vec<i64> {
        let mut ids = Vec::new();
        self.for_each_leaf(&mut |leaf| {
            if leaf.record.id != DIRECTORY_ID {
                ids.push(leaf.record.id);
            }
        });
        ids
    }
}

pub fn find_node<'a>(forest: &'a [TreeNode], path: &str) -> Option<&'a TreeNode> {
    forest.iter().find_map(|node| node.find(path))
}

pub fn find_node_mut<'a>(forest: &'a mut [TreeNode], path: &str) -> Option<&'a mut TreeNode> {
    forest.iter_mut().find_map(|node| node.find_mut(path))
}
