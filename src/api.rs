use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{NewTask, Task, TaskPatch};

/// Route of the todo collection.
pub const TODOS_PATH: &str = "/api/todos";

/// Body of every non-success response, e.g. `{"error": "Not found"}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

/// CRUD surface shared by the local [`Store`](crate::storage::Store) and the
/// [`HttpClient`](crate::client::HttpClient).
pub trait TodoApi {
    fn list(&self) -> Result<Vec<Task>>;
    fn create(&self, new: &NewTask) -> Result<Task>;
    fn update(&self, id: &str, patch: &TaskPatch) -> Result<Task>;
    /// Removes `id`. The deleted record is returned when the backend sends
    /// one back; a successful delete with any other body yields `None`.
    fn delete(&self, id: &str) -> Result<Option<Task>>;
}

impl<T: TodoApi + ?Sized> TodoApi for &T {
    fn list(&self) -> Result<Vec<Task>> {
        (**self).list()
    }

    fn create(&self, new: &NewTask) -> Result<Task> {
        (**self).create(new)
    }

    fn update(&self, id: &str, patch: &TaskPatch) -> Result<Task> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: &str) -> Result<Option<Task>> {
        (**self).delete(id)
    }
}
