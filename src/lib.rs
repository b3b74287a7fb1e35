//! # todoust
//!
//! A small todo-list manager: an HTTP API that keeps tasks in a JSON file,
//! and a terminal client (interactive UI and one-shot commands) that lists,
//! creates, edits, completes and deletes them.
//!
//! Each task has a title, an optional due date and a priority
//! (`High`, `Medium` or `Low`). The client shows two sections: *Upcoming*,
//! sorted by priority, and *Completed*.

pub mod api;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod server;
pub mod storage;
pub mod tui;
pub mod view_model;

pub use error::{Error, Result};
