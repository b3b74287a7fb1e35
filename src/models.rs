use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Urgency of a task. Ordered `High < Medium < Low` by rank.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Sort key for the upcoming list: High = 0, Medium = 1, Low = 2.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn next(self) -> Priority {
        Self::ALL[(self.rank() as usize + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Priority {
        Self::ALL[(self.rank() as usize + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "h" => Ok(Priority::High),
            "medium" | "m" => Ok(Priority::Medium),
            "low" | "l" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{}'. Use High, Medium or Low.", other)),
        }
    }
}

// The server never rejects a task over its priority: any casing is accepted
// and anything unrecognised (null, a number, a typo) reads as Medium.
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = due_date::lenient_string(deserializer)?;
        Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
    }
}

/// Represents a single todo record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, assigned by the store and never reused.
    pub id: String,
    /// The text label of the task.
    #[serde(default)]
    pub title: String,
    /// Advisory due date, kept exactly as it was sent.
    #[serde(default, deserialize_with = "due_date::deserialize", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    /// Whether the task has been completed.
    #[serde(default)]
    pub completed: bool,
    /// Timestamp when the task was created.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// The due date as a wall-clock time, when it parses as one.
    pub fn due_at(&self) -> Option<NaiveDateTime> {
        self.due_date.as_deref().and_then(|s| parse_due_date(s).ok())
    }
}

/// Body of a create request.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "due_date::deserialize", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

/// Partial update: only the keys present on the wire overwrite the stored task.
///
/// `id` and `createdAt` are not part of the patch, so a body carrying them
/// leaves both untouched. An explicit `"dueDate": null` (or `""`) clears the
/// due date, which is why that field is a double option.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "due_date::deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn completed(completed: bool) -> TaskPatch {
        TaskPatch {
            completed: Some(completed),
            ..TaskPatch::default()
        }
    }

    /// Shallow merge over `task`.
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(due) = &self.due_date {
            task.due_date = due.clone();
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

/// Parses a due date as typed by a user or sent by a browser.
///
/// Accepts RFC 3339 timestamps (converted to local time),
/// `YYYY-MM-DDTHH:MM[:SS[.f]]`, `YYYY-MM-DD HH:MM` and a bare `YYYY-MM-DD`
/// (midnight).
pub fn parse_due_date(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Local).naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::default())))
}

/// Writes a due date in the `datetime-local` shape, `YYYY-MM-DDTHH:MM`.
pub fn format_due_date(due: &NaiveDateTime) -> String {
    due.format("%Y-%m-%dT%H:%M").to_string()
}

/// Serde glue for `dueDate`: any string is kept, blank or non-string means none.
mod due_date {
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Other(IgnoredAny),
    }

    /// A string value, or `None` for null or any other JSON type.
    pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Loose::deserialize(deserializer)? {
            Loose::Text(s) => Some(s),
            Loose::Other(_) => None,
        })
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = lenient_string(deserializer)?;
        Ok(raw.filter(|s| !s.trim().is_empty()))
    }

    // Only invoked when the key is present; an absent key falls back to `default`.
    pub fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize(deserializer).map(Some)
    }
}
