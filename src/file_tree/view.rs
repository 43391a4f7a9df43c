use tracing::{info, warn};

use crate::remote::RemoteService;
use crate::transmission_client::{FileRecord, DIRECTORY_ID};
use crate::types::ClientError;

use super::builder::build_tree;
use super::node::{find_node, find_node_mut, TreeNode};
use super::propagate::{self, check_consistency, check_forest_consistency, TriState};

/// File selection state for one torrent's detail view.
#[derive(Debug, Clone)]
pub struct FileTreeView {
    torrent_id: i64,
    records: Vec<FileRecord>,
    roots: Vec<TreeNode>,
    last_error: Option<String>,
}

impl FileTreeView {
    pub fn from_records(torrent_id: i64, records: Vec<FileRecord>) -> Self {
        let roots = build_tree(&records);
        Self {
            torrent_id,
            records,
            roots,
            last_error: None,
        }
    }

    pub async fn open<R>(remote: &R, torrent_id: i64) -> Result<Self, ClientError>
    where
        R: RemoteService + ?Sized,
    {
        let records = remote.list_files(torrent_id).await?;
        info!(torrent = torrent_id, files = records.len(), "Loaded torrent files");
        Ok(Self::from_records(torrent_id, records))
    }

    /// Re-fetch the file list, keeping collapsed directories collapsed.
    pub async fn reload<R>(&mut self, remote: &R) -> Result<(), ClientError>
    where
        R: RemoteService + ?Sized,
    {
        let records = remote.list_files(self.torrent_id).await?;
        let mut collapsed = Vec::new();
        for node in &self.roots {
            collect_collapsed(node, &mut collapsed);
        }
        self.roots = build_tree(&records);
        self.records = records;
        for path in collapsed {
            if let Some(node) = find_node_mut(&mut self.roots, &path) {
                node.expanded = false;
            }
        }
        Ok(())
    }

    pub fn torrent_id(&self) -> i64 {
        self.torrent_id
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn tri_state(&self) -> TriState {
        propagate::tri_state(&self.roots)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Flip a directory's expanded flag. Returns the new value.
    pub fn toggle_expanded(&mut self, path: &str) -> Result<bool, ClientError> {
        let node = find_node_mut(&mut self.roots, path)
            .ok_or_else(|| ClientError::UnknownPath(path.to_string()))?;
        node.expanded = !node.expanded;
        Ok(node.expanded)
    }

    /// Ids taken from the flat file list rather than the tree.
    fn record_ids_under(&self, path: &str, directory: bool) -> Vec<i64> {
        self.records
            .iter()
            .filter(|r| r.id != DIRECTORY_ID)
            .filter(|r| {
                r.path == path
                    || (directory
                        && r.path
                            .strip_prefix(path)
                            .is_some_and(|rest| rest.starts_with('/')))
            })
            .map(|r| r.id)
            .collect()
    }

    /// Ask the daemon to (un)select the files at `path`, then mirror it locally.
    pub async fn set_wanted<R>(&mut self, remote: &R, path: &str, wanted: bool) -> Result<(), ClientError>
    where
        R: RemoteService + ?Sized,
    {
        let node = find_node(&self.roots, path).ok_or_else(|| ClientError::UnknownPath(path.to_string()))?;
        let file_ids = self.record_ids_under(path, node.is_directory());
        if let Err(err) = check_consistency(node, &file_ids) {
            self.last_error = Some(err.to_string());
            return Err(err);
        }
        if file_ids.is_empty() {
            return Ok(());
        }

        self.push_wanted(remote, &file_ids, wanted).await?;
        propagate::set_wanted(&mut self.roots, path, wanted, &file_ids)?;
        self.mark_records(&file_ids, wanted);
        Ok(())
    }

    /// Select everything unless everything is already selected.
    pub async fn toggle_all<R>(&mut self, remote: &R) -> Result<bool, ClientError>
    where
        R: RemoteService + ?Sized,
    {
        let wanted = propagate::toggle_target(self.tri_state());
        let file_ids: Vec<i64> = self
            .records
            .iter()
            .filter(|r| r.id != DIRECTORY_ID)
            .map(|r| r.id)
            .collect();
        if let Err(err) = check_forest_consistency(&self.roots, &file_ids) {
            self.last_error = Some(err.to_string());
            return Err(err);
        }
        if file_ids.is_empty() {
            return Ok(wanted);
        }

        self.push_wanted(remote, &file_ids, wanted).await?;
        propagate::set_all(&mut self.roots, wanted);
        self.mark_records(&file_ids, wanted);
        Ok(wanted)
    }

    async fn push_wanted<R>(&mut self, remote: &R, file_ids: &[i64], wanted: bool) -> Result<(), ClientError>
    where
        R: RemoteService + ?Sized,
    {
        match remote.set_files_wanted(self.torrent_id, file_ids, wanted).await {
            Ok(()) => {
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                warn!(torrent = self.torrent_id, error = %err, "Failed to update file selection");
                self.last_error = Some(format!("Failed to update files: {err}"));
                Err(err)
            }
        }
    }

    fn mark_records(&mut self, file_ids: &[i64], wanted: bool) {
        for record in self.records.iter_mut().filter(|r| file_ids.contains(&r.id)) {
            record.wanted = wanted;
        }
    }
}

fn collect_collapsed(node: &TreeNode, out: &mut Vec<String>) {
    if !node.expanded {
        out.push(node.path().to_string());
    }
    for child in node.children() {
        collect_collapsed(child, out);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::reconcile::Action;
    use crate::transmission_client::Torrent;

    struct FakeRemote {
        files: Vec<FileRecord>,
        reject: bool,
        wanted_calls: Mutex<Vec<(i64, Vec<i64>, bool)>>,
    }

    impl FakeRemote {
        fn new(files: Vec<FileRecord>) -> Self {
            Self {
                files,
                reject: false,
                wanted_calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RemoteService for FakeRemote {
        async fn list_items(&self) -> Result<Vec<Torrent>, ClientError> {
            Ok(Vec::new())
        }

        async fn list_files(&self, _: i64) -> Result<Vec<FileRecord>, ClientError> {
            Ok(self.files.clone())
        }

        async fn apply_intent(&self, _: &Action, _: &[i64]) -> Result<(), ClientError> {
            Ok(())
        }

        async fn set_files_wanted(&self, item_id: i64, file_ids: &[i64], wanted: bool) -> Result<(), ClientError> {
            self.wanted_calls
                .lock()
                .unwrap()
                .push((item_id, file_ids.to_vec(), wanted));
            if self.reject {
                return Err(ClientError::Rpc("invalid argument".to_string()));
            }
            Ok(())
        }
    }

    fn files() -> Vec<FileRecord> {
        vec![
            FileRecord::new(0, "a/b.txt", 10, 100.0, true),
            FileRecord::new(1, "a/c.txt", 20, 0.0, false),
        ]
    }

    #[tokio::test]
    async fn unwanting_a_directory_unwants_all_files() {
        let remote = FakeRemote::new(files());
        let mut view = FileTreeView::open(&remote, 7).await.unwrap();

        assert_eq!(view.roots().len(), 1);
        assert_eq!(view.roots()[0].children().len(), 2);
        assert_eq!(view.tri_state(), TriState::Indeterminate);

        view.set_wanted(&remote, "a", false).await.unwrap();

        assert_eq!(view.tri_state(), TriState::Unchecked);
        assert!(view.records().iter().all(|r| !r.wanted));
        assert_eq!(
            *remote.wanted_calls.lock().unwrap(),
            vec![(7, vec![0, 1], false)]
        );
    }

    #[tokio::test]
    async fn rejected_update_leaves_tree_unchanged() {
        let mut remote = FakeRemote::new(files());
        remote.reject = true;
        let mut view = FileTreeView::open(&remote, 7).await.unwrap();
        let before = view.roots().to_vec();

        let result = view.set_wanted(&remote, "a/c.txt", true).await;

        assert!(result.is_err());
        assert_eq!(view.roots(), before.as_slice());
        assert!(view.last_error().unwrap().contains("invalid argument"));
    }

    #[tokio::test]
    async fn toggle_all_selects_everything_from_partial() {
        let remote = FakeRemote::new(files());
        let mut view = FileTreeView::open(&remote, 1).await.unwrap();

        assert!(view.toggle_all(&remote).await.unwrap());
        assert_eq!(view.tri_state(), TriState::Checked);

        assert!(!view.toggle_all(&remote).await.unwrap());
        assert_eq!(view.tri_state(), TriState::Unchecked);
    }

    #[tokio::test]
    async fn toggle_all_refuses_when_a_record_is_missing_from_the_tree() {
        let remote = FakeRemote::new(Vec::new());
        let mut view = FileTreeView::from_records(
            3,
            vec![
                FileRecord::new(0, "a", 1, 0.0, false),
                FileRecord::new(1, "a/b", 1, 0.0, false),
            ],
        );

        let result = view.toggle_all(&remote).await;

        assert!(matches!(result, Err(ClientError::Desync { .. })));
        assert!(remote.wanted_calls.lock().unwrap().is_empty());
        assert!(view.records().iter().all(|r| !r.wanted));
        assert_eq!(view.tri_state(), TriState::Unchecked);
        assert!(view.last_error().is_some());
    }

    #[tokio::test]
    async fn empty_directory_makes_no_remote_call() {
        let remote = FakeRemote::new(Vec::new());
        let mut view = FileTreeView::from_records(1, Vec::new());
        view.roots.push(TreeNode::directory("empty"));

        view.set_wanted(&remote, "empty", false).await.unwrap();
        assert!(remote.wanted_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn desync_is_reported_before_any_remote_call() {
        let remote = FakeRemote::new(Vec::new());
        // The same path twice: the tree keeps one file, the list has two.
        let mut view = FileTreeView::from_records(
            1,
            vec![
                FileRecord::new(0, "dup", 1, 0.0, true),
                FileRecord::new(1, "dup", 1, 0.0, true),
            ],
        );

        let result = view.set_wanted(&remote, "dup", false).await;

        assert!(matches!(result, Err(ClientError::Desync { .. })));
        assert!(remote.wanted_calls.lock().unwrap().is_empty());
        assert!(view.last_error().is_some());
    }

    #[tokio::test]
    async fn reload_keeps_collapsed_directories() {
        let remote = FakeRemote::new(files());
        let mut view = FileTreeView::open(&remote, 1).await.unwrap();
        assert!(view.roots()[0].expanded);
        assert!(!view.toggle_expanded("a").unwrap());

        view.reload(&remote).await.unwrap();
        assert!(!view.roots()[0].expanded);
        assert!(view.roots()[0].children()[0].expanded);
        assert!(matches!(
            view.toggle_expanded("missing"),
            Err(ClientError::UnknownPath(_))
        ));
    }
}
