//! Project persistence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::{NewProject, Project};

/// Storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("project {0} not found")]
    NotFound(u64),
    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed project data in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where project records live.
pub trait ProjectStore {
    /// All projects, ascending by id.
    fn list(&self) -> Result<Vec<Project>, StoreError>;

    fn get(&self, id: u64) -> Result<Project, StoreError> {
        self.list()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Store a new project, assigning its id and creation time.
    fn insert(&mut self, project: NewProject) -> Result<Project, StoreError>;

    /// Replace a project's fields, keeping its id and creation time.
    fn update(&mut self, id: u64, project: NewProject) -> Result<Project, StoreError>;

    fn delete(&mut self, id: u64) -> Result<(), StoreError>;
}

/// The first `n` projects, for the home page.
///
/// # Errors
/// Propagates store failures.
pub fn featured(store: &impl ProjectStore, n: usize) -> Result<Vec<Project>, StoreError> {
    let mut projects = store.list()?;
    projects.truncate(n);
    Ok(projects)
}

/// Projects kept in one pretty-printed JSON array on disk.
///
/// A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> Result<Vec<Project>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(self.io_error(err)),
        };
        let mut projects: Vec<Project> =
            serde_json::from_str(&content).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;
        projects.sort_by_key(|p| p.id);
        Ok(projects)
    }

    fn save(&self, projects: &[Project]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(projects).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, format!("{json}\n")).map_err(|e| self.io_error(e))?;
        tracing::debug!(path = %self.path.display(), count = projects.len(), "saved projects");
        Ok(())
    }
}

impl ProjectStore for JsonFileStore {
    fn list(&self) -> Result<Vec<Project>, StoreError> {
        self.load()
    }

    fn insert(&mut self, project: NewProject) -> Result<Project, StoreError> {
        let mut projects = self.load()?;
        let id = projects.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let created = project.into_project(id, Utc::now());
        projects.push(created.clone());
        self.save(&projects)?;
        Ok(created)
    }

    fn update(&mut self, id: u64, project: NewProject) -> Result<Project, StoreError> {
        let mut projects = self.load()?;
        let slot = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound(id))?;
        *slot = project.into_project(id, slot.created_at);
        let updated = slot.clone();
        self.save(&projects)?;
        Ok(updated)
    }

    fn delete(&mut self, id: u64) -> Result<(), StoreError> {
        let mut projects = self.load()?;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Err(StoreError::NotFound(id));
        }
        self.save(&projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectDraft;
    use tempfile::tempdir;

    fn new_project(title: &str) -> NewProject {
        ProjectDraft {
            title: title.to_string(),
            description: "desc".to_string(),
            tech_stack: "Rust".to_string(),
            ..ProjectDraft::default()
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("projects.json"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("data").join("projects.json"));
        let a = store.insert(new_project("a")).unwrap();
        let b = store.insert(new_project("b")).unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        let titles: Vec<String> = store.list().unwrap().into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn test_update_keeps_id_and_created_at() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("projects.json"));
        let original = store.insert(new_project("a")).unwrap();
        let updated = store.update(original.id, new_project("renamed")).unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(store.get(original.id).unwrap().title, "renamed");
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("projects.json"));
        assert!(matches!(
            store.update(9, new_project("x")),
            Err(StoreError::NotFound(9))
        ));
    }

    #[test]
    fn test_delete_removes_and_reports_missing() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("projects.json"));
        let a = store.insert(new_project("a")).unwrap();
        store.delete(a.id).unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(matches!(store.delete(a.id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_ids_not_reused_after_delete_of_earlier() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("projects.json"));
        let a = store.insert(new_project("a")).unwrap();
        let b = store.insert(new_project("b")).unwrap();
        store.delete(a.id).unwrap();
        let c = store.insert(new_project("c")).unwrap();
        assert_eq!(c.id, b.id + 1);
    }

    #[test]
    fn test_featured_takes_first_n() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("projects.json"));
        for title in ["a", "b", "c"] {
            store.insert(new_project(title)).unwrap();
        }
        let top = featured(&store, 2).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].title, "a");
    }

    #[test]
    fn test_malformed_file_is_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("projects.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.list(), Err(StoreError::Json { .. })));
    }
}
