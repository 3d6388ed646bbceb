//! Vote state machine: per-user/per-item vote state and counter deltas.
//!
//! The types here are pure; applying a transition never touches storage.
//! [`VoteLedger`](super::vote_ledger::VoteLedger) owns the serialization and
//! persistence of transitions.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors for [`ItemId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemIdValidationError {
    #[error("item id must not be empty")]
    Empty,
    #[error("item id must be a valid UUID")]
    Invalid,
}

/// Stable content-item identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(Uuid, String);

impl ItemId {
    /// Validate and construct an [`ItemId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ItemIdValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`ItemId`].
    pub fn random() -> Self {
        let uuid = Uuid::new_v4();
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, ItemIdValidationError> {
        if id.is_empty() {
            return Err(ItemIdValidationError::Empty);
        }
        if id.trim() != id {
            return Err(ItemIdValidationError::Invalid);
        }
        let parsed = Uuid::parse_str(&id).map_err(|_| ItemIdValidationError::Invalid)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ItemId> for String {
    fn from(value: ItemId) -> Self {
        value.1
    }
}

impl TryFrom<String> for ItemId {
    type Error = ItemIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Requested vote direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Parse the wire form used in request paths (`upvote` / `downvote`).
    /// Anything else is an invalid argument.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "upvote" => Some(Self::Up),
            "downvote" => Some(Self::Down),
            _ => None,
        }
    }

    /// Wire representation of the direction.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "upvote",
            Self::Down => "downvote",
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per `(user, item)` vote state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoteState {
    #[default]
    NoVote,
    VotedUp,
    VotedDown,
}

impl VoteState {
    /// The direction recorded by this state, if any.
    pub const fn direction(&self) -> Option<VoteDirection> {
        match self {
            Self::NoVote => None,
            Self::VotedUp => Some(VoteDirection::Up),
            Self::VotedDown => Some(VoteDirection::Down),
        }
    }

    /// Recover a state from a stored vote record.
    pub const fn from_direction(direction: Option<VoteDirection>) -> Self {
        match direction {
            None => Self::NoVote,
            Some(VoteDirection::Up) => Self::VotedUp,
            Some(VoteDirection::Down) => Self::VotedDown,
        }
    }

    /// Apply one requested direction to the current state.
    ///
    /// Repeating the recorded direction retracts the vote; requesting the
    /// opposite direction switches it; voting from `NoVote` records it.
    pub const fn apply(self, requested: VoteDirection) -> Transition {
        match (self, requested) {
            (Self::NoVote, VoteDirection::Up) => Transition {
                next: Self::VotedUp,
                delta: CounterDelta { up: 1, down: 0 },
            },
            (Self::NoVote, VoteDirection::Down) => Transition {
                next: Self::VotedDown,
                delta: CounterDelta { up: 0, down: 1 },
            },
            (Self::VotedUp, VoteDirection::Up) => Transition {
                next: Self::NoVote,
                delta: CounterDelta { up: -1, down: 0 },
            },
            (Self::VotedUp, VoteDirection::Down) => Transition {
                next: Self::VotedDown,
                delta: CounterDelta { up: -1, down: 1 },
            },
            (Self::VotedDown, VoteDirection::Down) => Transition {
                next: Self::NoVote,
                delta: CounterDelta { up: 0, down: -1 },
            },
            (Self::VotedDown, VoteDirection::Up) => Transition {
                next: Self::VotedUp,
                delta: CounterDelta { up: 1, down: -1 },
            },
        }
    }
}

/// Signed adjustment to an item's counters, always in `-1..=1` per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterDelta {
    pub up: i64,
    pub down: i64,
}

/// Outcome of applying one requested direction to a vote state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: VoteState,
    pub delta: CounterDelta,
}

/// Raised when a delta would drive a counter negative. Indicates a record
/// and its counters drifted apart, which the ledger treats as internal
/// corruption rather than a caller error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("vote counters would go negative (up {up}, down {down})")]
pub struct CounterUnderflow {
    pub up: i64,
    pub down: i64,
}

/// Per-item aggregate vote counters.
///
/// ## Invariants
/// - Each counter equals the number of stored vote records in that
///   direction; both are non-negative.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct VoteCounters {
    #[schema(example = 3)]
    pub up_count: u64,
    #[schema(example = 1)]
    pub down_count: u64,
}

impl VoteCounters {
    /// Apply a transition delta, refusing to go negative.
    pub fn apply(self, delta: CounterDelta) -> Result<Self, CounterUnderflow> {
        let up = i64::try_from(self.up_count)
            .ok()
            .and_then(|v| v.checked_add(delta.up));
        let down = i64::try_from(self.down_count)
            .ok()
            .and_then(|v| v.checked_add(delta.down));
        match (up, down) {
            (Some(up), Some(down)) if up >= 0 && down >= 0 => Ok(Self {
                up_count: up as u64,
                down_count: down as u64,
            }),
            _ => Err(CounterUnderflow {
                up: delta.up,
                down: delta.down,
            }),
        }
    }
}
