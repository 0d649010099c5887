use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::id::Id;

/// A ticket represents an item in a todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Uniquely identifies the ticket in a type safe way
    pub id: Id<Ticket>,
    /// Describes at the highest level the purpose of the ticket
    pub title: String,
    pub created_date: DateTime<Utc>,
}

impl Ticket {
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_details(Uuid::new_v4(), title, Utc::now())
    }

    pub fn with_details(id: Uuid, title: impl Into<String>, created_date: DateTime<Utc>) -> Self {
        Self {
            id: Id::from_uuid(id),
            title: title.into(),
            created_date,
        }
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}
