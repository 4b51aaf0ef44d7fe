//! Markdown vault task scanner
//!
//! Finds checkbox list items (`- [ ] text`, `- [x] text`) in every `.md` file
//! under the vault root.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use tracing::{debug, warn};
use vc_calendar::{CalendarError, TaskProvider, TaskRecord};

static TASK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[-*+]\s+\[( |x|X)\]\s+(\S.*?)\s*$").expect("valid task regex")
});

/// Task provider backed by a directory of markdown notes
pub struct VaultTaskProvider {
    root: PathBuf,
}

impl VaultTaskProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl TaskProvider for VaultTaskProvider {
    async fn tasks(&self) -> vc_calendar::Result<Vec<TaskRecord>> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || scan_vault(&root))
            .await
            .map_err(|e| CalendarError::TaskScan(e.to_string()))?
    }
}

/// Every task in the vault, files in path order
pub fn scan_vault(root: &Path) -> vc_calendar::Result<Vec<TaskRecord>> {
    if !root.is_dir() {
        warn!("Vault root {} is not a directory", root.display());
        return Err(CalendarError::TaskScan(format!(
            "vault root {} is not a directory",
            root.display()
        )));
    }

    let pattern = format!(
        "{}/**/*.md",
        glob::Pattern::escape(&root.display().to_string()).trim_end_matches('/')
    );
    debug!(pattern = %pattern, "Scanning vault");

    let entries = glob::glob(&pattern).map_err(|e| CalendarError::TaskScan(e.to_string()))?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Glob error: {}", e);
                None
            }
        })
        .collect();
    paths.sort();

    let mut tasks = Vec::new();
    for path in paths {
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        let relative = path.strip_prefix(root).unwrap_or(&path);
        tasks.extend(tasks_in(&content, &relative.display().to_string()));
    }

    debug!("Found {} tasks", tasks.len());
    Ok(tasks)
}

/// Task lines of one note. Lines are numbered from 1.
pub fn tasks_in(content: &str, path: &str) -> Vec<TaskRecord> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let caps = TASK_RE.captures(line)?;
            let completed = !caps[1].trim().is_empty();
            Some(TaskRecord {
                completed,
                text: caps[2].to_string(),
                link: json!({ "path": path, "line": index + 1 }),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_tasks_in_note() {
        let note = "# Plans\n\
                    - [ ] Dentist 2025-03-12\n\
                    - [x] Filed taxes 2025-03-01\n\
                    * [X] Upper case done\n\
                    - plain bullet 2025-03-02\n\
                    \t- [ ] Nested trip 2025-03-20 through 2025-03-22  \n";

        let tasks = tasks_in(note, "plans.md");
        assert_eq!(tasks.len(), 4);

        assert!(!tasks[0].completed);
        assert_eq!(tasks[0].text, "Dentist 2025-03-12");
        assert_eq!(tasks[0].link, json!({ "path": "plans.md", "line": 2 }));

        assert!(tasks[1].completed);
        assert!(tasks[2].completed);
        assert_eq!(tasks[3].text, "Nested trip 2025-03-20 through 2025-03-22");
        assert_eq!(tasks[3].link["line"], 6);
    }

    #[test]
    fn test_empty_checkbox_without_text_is_ignored() {
        assert!(tasks_in("- [ ]\n- [ ]   \n", "x.md").is_empty());
    }

    #[tokio::test]
    async fn test_scan_vault_walks_subdirectories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("daily")).unwrap();
        fs::write(dir.path().join("a.md"), "- [ ] Root task 2025-03-15\n").unwrap();
        fs::write(
            dir.path().join("daily/2025-03-16.md"),
            "text\n- [ ] Daily task 2025-03-16\n",
        )
        .unwrap();
        fs::write(dir.path().join("ignored.txt"), "- [ ] Not a note 2025-03-17\n").unwrap();

        let provider = VaultTaskProvider::new(dir.path());
        let tasks = provider.tasks().await.unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].link["path"], "a.md");
        assert_eq!(tasks[1].text, "Daily task 2025-03-16");
        assert_eq!(tasks[1].link["line"], 2);
        assert!(tasks[1].link["path"].as_str().unwrap().ends_with("2025-03-16.md"));
    }

    #[test]
    fn test_empty_vault_has_no_tasks() {
        let dir = TempDir::new().unwrap();
        assert!(scan_vault(dir.path()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_root_is_a_scan_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        fs::write(dir.path().join("note.md"), "- [ ] Task 2025-03-15\n").unwrap();

        match scan_vault(&missing) {
            Err(CalendarError::TaskScan(reason)) => assert!(reason.contains("not a directory")),
            other => panic!("unexpected result: {:?}", other),
        }

        // A file is not a vault either
        assert!(scan_vault(&dir.path().join("note.md")).is_err());

        let provider = VaultTaskProvider::new(&missing);
        assert!(matches!(provider.tasks().await, Err(CalendarError::TaskScan(_))));
    }
}
