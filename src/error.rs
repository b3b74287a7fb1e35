/// Errors raised by the store, the HTTP client and the view-model.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No task carries this id.
    #[error("task {0} not found")]
    NotFound(String),

    /// Form submitted without a title; blocked before any request is made.
    #[error("title must not be empty")]
    EmptyTitle,

    /// Form due date that the client could not parse.
    #[error("invalid due date '{0}'. Use YYYY-MM-DD or YYYY-MM-DDTHH:MM.")]
    InvalidDueDate(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed task data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success answer from the server.
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
