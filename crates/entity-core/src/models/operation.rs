use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants;

/// The five write operations an entity reducer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operation {
    /// Freshness-gated shallow merge.
    #[serde(rename = "MERGE_ENTITIES")]
    Merge,
    /// Same gate as `Merge`, for partial updates from the owning source.
    #[serde(rename = "UPDATE_ENTITIES")]
    Update,
    /// Unconditional overwrite of the named ids.
    #[serde(rename = "REPLACE_ENTITIES")]
    Replace,
    /// Unconditional replacement of the whole slice.
    #[serde(rename = "RESET_ENTITIES")]
    Reset,
    /// Deletion of the named ids.
    #[serde(rename = "REMOVE_ENTITIES")]
    Remove,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Merge,
        Operation::Remove,
        Operation::Replace,
        Operation::Reset,
        Operation::Update,
    ];

    /// Wire name used in plain-record actions.
    pub fn action_type(self) -> &'static str {
        match self {
            Operation::Merge => constants::MERGE_ENTITIES,
            Operation::Update => constants::UPDATE_ENTITIES,
            Operation::Replace => constants::REPLACE_ENTITIES,
            Operation::Reset => constants::RESET_ENTITIES,
            Operation::Remove => constants::REMOVE_ENTITIES,
        }
    }

    /// Whether the operation goes through the freshness/diff gate.
    pub fn is_gated(self) -> bool {
        matches!(self, Operation::Merge | Operation::Update)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_type())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            constants::MERGE_ENTITIES => Ok(Operation::Merge),
            constants::UPDATE_ENTITIES => Ok(Operation::Update),
            constants::REPLACE_ENTITIES => Ok(Operation::Replace),
            constants::RESET_ENTITIES => Ok(Operation::Reset),
            constants::REMOVE_ENTITIES => Ok(Operation::Remove),
            other => Err(format!("unknown entity operation: {other}")),
        }
    }
}
