//! Acting identity
//!
//! Every mutating operation is stamped with the actor that performed it.
//! The actor is always passed explicitly as a parameter; handlers never read
//! it from ambient request state.

use serde::{Deserialize, Serialize};

/// Kind of actor allowed to place and settle orders
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    Admin,
    Staff,
}

impl ActorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorKind::Admin => "admin",
            ActorKind::Staff => "staff",
        }
    }
}

/// Acting identity: role + id + display name
///
/// Kept as a tagged value rather than a free-form role string so ownership
/// checks cannot drift from the role vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub kind: ActorKind,
    pub id: String,
    pub name: String,
}

impl Actor {
    pub fn new(kind: ActorKind, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            name: name.into(),
        }
    }

    /// Admins may mutate any record; staff only records they placed
    pub fn is_admin(&self) -> bool {
        self.kind == ActorKind::Admin
    }
}
