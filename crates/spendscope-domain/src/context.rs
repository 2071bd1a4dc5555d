//! Parent scopes that own records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a group or period.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(String);

impl ContextId {
    /// Wraps a raw identifier; blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two kinds of parent scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    /// Recurring context; listings hide dates and states.
    Group,
    /// Fixed time span; listings show every column.
    Period,
}

impl ContextKind {
    pub const ALL: [ContextKind; 2] = [ContextKind::Group, ContextKind::Period];

    /// Period listings show the record date and settlement state.
    pub fn shows_date_and_state(self) -> bool {
        matches!(self, ContextKind::Period)
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContextKind::Group => "group",
            ContextKind::Period => "period",
        };
        f.write_str(label)
    }
}

/// A group or a period together with its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ContextRef {
    Group(ContextId),
    Period(ContextId),
}

impl ContextRef {
    pub fn new(kind: ContextKind, id: ContextId) -> Self {
        match kind {
            ContextKind::Group => ContextRef::Group(id),
            ContextKind::Period => ContextRef::Period(id),
        }
    }

    pub fn kind(&self) -> ContextKind {
        match self {
            ContextRef::Group(_) => ContextKind::Group,
            ContextRef::Period(_) => ContextKind::Period,
        }
    }

    pub fn id(&self) -> &ContextId {
        match self {
            ContextRef::Group(id) | ContextRef::Period(id) => id,
        }
    }
}

impl fmt::Display for ContextRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}
