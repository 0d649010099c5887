//! Type-safe identifiers.
//!
//! `Id<A>` wraps a UUID and carries a phantom domain tag, so an `Id<Ticket>`
//! cannot be compared with an `Id<Tree<Ticket>>` even though both are UUIDs.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier scoped to the domain `A`.
///
/// Serializes as `{ "uuid": "<hyphenated uuid>" }`.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Id<A> {
    uuid: Uuid,
    #[serde(skip)]
    domain: PhantomData<fn() -> A>,
}

impl<A> Id<A> {
    /// Mint a fresh random identifier.
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            domain: PhantomData,
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl<A> Default for Id<A> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual impls: derives would demand the same traits from the tag type.
impl<A> Clone for Id<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for Id<A> {}

impl<A> PartialEq for Id<A> {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl<A> Eq for Id<A> {}

impl<A> Hash for Id<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}

impl<A> fmt::Debug for Id<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.uuid)
    }
}

impl<A> fmt::Display for Id<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uuid)
    }
}

impl<A> From<Uuid> for Id<A> {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}
