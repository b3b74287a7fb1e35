use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::TodoApi;
use crate::error::{Error, Result};
use crate::models::{NewTask, Task, TaskPatch};

/// JSON-file backed task collection.
///
/// Every mutation reads the whole file, applies the change and rewrites the
/// whole file. The mutex serializes that cycle inside one process only;
/// two processes sharing a file still race and the last writer wins.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl Store {
    pub fn open(path: impl Into<PathBuf>) -> Store {
        Store {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns all tasks in insertion order.
    ///
    /// A missing or empty file is an empty collection.
    pub fn list(&self) -> Result<Vec<Task>> {
        let _guard = self.lock();
        self.load()
    }

    /// Appends a new task with a fresh id, `completed = false` and `createdAt = now`.
    pub fn create(&self, new: &NewTask) -> Result<Task> {
        let _guard = self.lock();
        let mut tasks = self.load()?;
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: new.title.clone(),
            due_date: new.due_date.clone(),
            priority: new.priority.unwrap_or_default(),
            completed: false,
            created_at: Utc::now(),
        };
        tasks.push(task.clone());
        self.save(&tasks)?;
        info!(id = %task.id, title = %task.title, "task created");
        Ok(task)
    }

    /// Merges `patch` over the task with this id.
    pub fn update(&self, id: &str, patch: &TaskPatch) -> Result<Task> {
        let _guard = self.lock();
        let mut tasks = self.load()?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        patch.apply(task);
        let updated = task.clone();
        self.save(&tasks)?;
        info!(id = %updated.id, "task updated");
        Ok(updated)
    }

    /// Removes the task with this id and returns it.
    pub fn delete(&self, id: &str) -> Result<Task> {
        let _guard = self.lock();
        let mut tasks = self.load()?;
        let idx = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let deleted = tasks.remove(idx);
        self.save(&tasks)?;
        info!(id = %deleted.id, "task deleted");
        Ok(deleted)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded data is `()`, so a poisoned lock carries no broken state.
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load(&self) -> Result<Vec<Task>> {
        let mut f = match OpenOptions::new().read(true).open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        if s.trim().is_empty() {
            return Ok(Vec::new());
        }
        let tasks: Vec<Task> = serde_json::from_str(&s)?;
        debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    /// Overwrites the file with the full collection.
    fn save(&self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let s = serde_json::to_string_pretty(tasks)?;
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        f.write_all(s.as_bytes())?;
        debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}

impl TodoApi for Store {
    fn list(&self) -> Result<Vec<Task>> {
        Store::list(self)
    }

    fn create(&self, new: &NewTask) -> Result<Task> {
        Store::create(self, new)
    }

    fn update(&self, id: &str, patch: &TaskPatch) -> Result<Task> {
        Store::update(self, id, patch)
    }

    fn delete(&self, id: &str) -> Result<Option<Task>> {
        Store::delete(self, id).map(Some)
    }
}
