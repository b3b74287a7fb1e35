use std::path::PathBuf;

/// Environment variable overriding the data file location.
pub const DB_ENV: &str = "TODOS_DB";
pub const PORT_ENV: &str = "TODOS_PORT";
pub const BIND_ENV: &str = "TODOS_BIND";
/// Base URL the client talks to.
pub const API_URL_ENV: &str = "TODOS_API_URL";

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_API_URL: &str = "http://localhost:4000";

/// Returns the path to the todos file (`todos.json`).
///
/// The path is determined in the following order:
/// 1. `TODOS_DB` environment variable.
/// 2. `~/.local/share/todoust/todos.json` (on Linux).
/// 3. `./todos.json` (fallback).
///
/// Nothing is created here; the store makes missing parent directories on
/// its first write.
pub fn db_path() -> PathBuf {
    std::env::var(DB_ENV).map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("todoust");
        p.push("todos.json");
        p
    })
}
