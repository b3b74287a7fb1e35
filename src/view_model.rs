//! Client-side cache of the todo collection.
//!
//! The [`ViewModel`] fetches the full list once, forwards every mutation to a
//! [`TodoApi`] and merges the returned record into its cached copy. A failed
//! call leaves the cache untouched; nothing is retried.

use tracing::debug;

use crate::api::TodoApi;
use crate::error::{Error, Result};
use crate::models::{format_due_date, parse_due_date, NewTask, Priority, Task, TaskPatch};

/// The two display partitions of the task list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Categorized {
    /// Incomplete tasks, stably sorted by priority rank.
    pub upcoming: Vec<Task>,
    /// Completed tasks in source order.
    pub completed: Vec<Task>,
}

impl Categorized {
    pub fn len(&self) -> usize {
        self.upcoming.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Task at `index` when walking upcoming first, then completed.
    pub fn get(&self, index: usize) -> Option<&Task> {
        self.upcoming
            .get(index)
            .or_else(|| index.checked_sub(self.upcoming.len()).and_then(|i| self.completed.get(i)))
    }
}

/// Splits `tasks` by completion and orders the upcoming part High, Medium, Low.
pub fn categorize(tasks: &[Task]) -> Categorized {
    let (mut upcoming, completed): (Vec<Task>, Vec<Task>) =
        tasks.iter().cloned().partition(|t| !t.completed);
    // `sort_by_key` is stable: equal ranks keep their relative order.
    upcoming.sort_by_key(|t| t.priority.rank());
    Categorized { upcoming, completed }
}

/// Contents of the add/edit form, as the user typed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskForm {
    pub title: String,
    /// Free text; empty means no due date.
    pub due_date: String,
    pub priority: Priority,
}

impl TaskForm {
    /// Pre-fills the form from a stored task.
    pub fn from_task(task: &Task) -> TaskForm {
        TaskForm {
            title: task.title.clone(),
            due_date: task
                .due_at()
                .map(|d| format_due_date(&d))
                .or_else(|| task.due_date.clone())
                .unwrap_or_default(),
            priority: task.priority,
        }
    }

    pub fn clear(&mut self) {
        *self = TaskForm::default();
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::EmptyTitle);
        }
        Ok(())
    }

    /// The server stores any string, so the form is the only place a due
    /// date is checked; what it sends is normalized to `YYYY-MM-DDTHH:MM`.
    fn parsed_due_date(&self) -> Result<Option<String>> {
        let raw = self.due_date.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        parse_due_date(raw)
            .map(|d| Some(format_due_date(&d)))
            .map_err(|_| Error::InvalidDueDate(raw.to_string()))
    }

    pub fn to_new_task(&self) -> Result<NewTask> {
        self.validate()?;
        Ok(NewTask {
            title: self.title.clone(),
            due_date: self.parsed_due_date()?,
            priority: Some(self.priority),
        })
    }

    /// Full-form patch: title, due date (cleared when blank) and priority.
    pub fn to_patch(&self) -> Result<TaskPatch> {
        self.validate()?;
        Ok(TaskPatch {
            title: Some(self.title.clone()),
            due_date: Some(self.parsed_due_date()?),
            priority: Some(self.priority),
            completed: None,
        })
    }
}

/// Whether the form creates a new task or edits an existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Idle,
    Editing(String),
}

pub struct ViewModel<A: TodoApi> {
    api: A,
    tasks: Vec<Task>,
    pub form: TaskForm,
    mode: EditMode,
}

impl<A: TodoApi> ViewModel<A> {
    /// Creates an empty view-model; call [`ViewModel::load`] to fill the cache.
    pub fn new(api: A) -> ViewModel<A> {
        ViewModel {
            api,
            tasks: Vec::new(),
            form: TaskForm::default(),
            mode: EditMode::Idle,
        }
    }

    /// Replaces the cache with the server's full list.
    pub fn load(&mut self) -> Result<()> {
        self.tasks = self.api.list()?;
        debug!(count = self.tasks.len(), "loaded task cache");
        Ok(())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn categorized(&self) -> Categorized {
        categorize(&self.tasks)
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, EditMode::Editing(_))
    }

    /// Enters edit mode for `task` and pre-fills the form.
    pub fn start_edit(&mut self, task: &Task) {
        self.mode = EditMode::Editing(task.id.clone());
        self.form = TaskForm::from_task(task);
    }

    /// Leaves edit mode and discards whatever was typed.
    pub fn cancel_edit(&mut self) {
        self.mode = EditMode::Idle;
        self.form.clear();
    }

    /// Creates or updates depending on the current mode.
    pub fn submit(&mut self) -> Result<Task> {
        match self.mode.clone() {
            EditMode::Idle => self.submit_create(),
            EditMode::Editing(id) => self.submit_edit(&id),
        }
    }

    /// Sends the form as a new task and appends the result to the cache.
    pub fn submit_create(&mut self) -> Result<Task> {
        let new = self.form.to_new_task()?;
        let task = self.api.create(&new)?;
        self.tasks.push(task.clone());
        self.form.clear();
        Ok(task)
    }

    /// Sends the form as an update of `id` and swaps the cached copy.
    pub fn submit_edit(&mut self, id: &str) -> Result<Task> {
        let patch = self.form.to_patch()?;
        let task = self.api.update(id, &patch)?;
        self.replace(&task);
        self.mode = EditMode::Idle;
        self.form.clear();
        Ok(task)
    }

    /// Flips the completion flag of `task`.
    pub fn toggle_complete(&mut self, task: &Task) -> Result<Task> {
        let updated = self.api.update(&task.id, &TaskPatch::completed(!task.completed))?;
        self.replace(&updated);
        Ok(updated)
    }

    /// Deletes `id`; the cached copy goes regardless of the returned payload.
    pub fn remove(&mut self, id: &str) -> Result<()> {
        self.api.delete(id)?;
        self.tasks.retain(|t| t.id != id);
        Ok(())
    }

    fn replace(&mut self, task: &Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task.clone();
        }
    }
}
