use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents a task row as stored in the database and rendered in templates.
#[derive(Debug, Serialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub is_done: bool,
    /// Unsigned by contract; stored as a plain integer column.
    pub priority: i32,
    /// Kept as the string the form submitted.
    pub deadline: String,
    pub created_at: DateTime<Utc>,
}

/// Query parameters accepted by the list view.
///
/// `page` stays a raw string: an absent or empty value defaults to page 1,
/// while a non-numeric value silently becomes 0. Both behaviors are part of
/// the contract.
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    pub kw: Option<String>,
    pub status: Option<String>,
    pub page: Option<String>,
}

impl TaskQuery {
    pub fn page_number(&self) -> i64 {
        match self.page.as_deref() {
            None | Some("") => 1,
            Some(raw) => raw.parse().unwrap_or(0),
        }
    }
}

/// Creation form payload. Every field must be present; each absent field is
/// reported on its own.
#[derive(Debug, Deserialize)]
pub struct NewTaskForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub deadline: Option<String>,
}

impl NewTaskForm {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.is_none() {
            return Err("No title is given");
        }
        if self.description.is_none() {
            return Err("No description is given");
        }
        if self.priority.is_none() {
            return Err("No priority is given");
        }
        if self.deadline.is_none() {
            return Err("No deadline is given");
        }
        Ok(())
    }
}

/// Edit form payload. All fields are applied leniently: missing strings
/// become empty, an unparsable completion flag becomes false and an
/// unparsable priority becomes zero.
#[derive(Debug, Deserialize)]
pub struct EditTaskForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_done: Option<String>,
    pub priority: Option<String>,
    pub deadline: Option<String>,
}

impl EditTaskForm {
    pub fn is_done_value(&self) -> bool {
        self.is_done
            .as_deref()
            .unwrap_or_default()
            .parse()
            .unwrap_or(false)
    }

    pub fn priority_value(&self) -> i32 {
        self.priority
            .as_deref()
            .unwrap_or_default()
            .parse::<i32>()
            .unwrap_or(0)
            .max(0)
    }
}
