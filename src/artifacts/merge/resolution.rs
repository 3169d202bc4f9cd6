//! Per-path three-way classification
//!
//! Each path is judged by the blob ids it has at the split point, the current
//! head and the other head. The first matching row wins:
//!
//! | split | current | other | condition                 | action     |
//! |-------|---------|-------|---------------------------|------------|
//! | S     | C       | O     | `S == C`, `O != C`        | take other |
//! | S     | C       | O     | `C != S`, `O != C`, `S != O` | conflict |
//! | S     | C       | -     | `S == C`                  | remove     |
//! | S     | C       | -     | `S != C`                  | conflict   |
//! | -     | -       | O     |                           | take other |
//! | S     | -       | O     | `S != O`                  | conflict   |
//! | -     | C       | O     | `C != O`                  | conflict   |
//!
//! Anything else leaves the path untouched.

use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;

bitflags! {
    /// Which of the three commits track a path
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Presence: u8 {
        const SPLIT = 0b001;
        const CURRENT = 0b010;
        const OTHER = 0b100;
    }
}

impl Presence {
    pub fn of(split: Option<&ObjectId>, current: Option<&ObjectId>, other: Option<&ObjectId>) -> Self {
        let mut presence = Presence::empty();
        presence.set(Presence::SPLIT, split.is_some());
        presence.set(Presence::CURRENT, current.is_some());
        presence.set(Presence::OTHER, other.is_some());
        presence
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    /// Check out the other side's content and stage it
    TakeOther,
    /// Delete the path and stage its removal
    Remove,
    /// Write a conflict block and stage it
    Conflict,
    /// Leave the path as the current head has it
    Keep,
}

pub fn classify(
    split: Option<&ObjectId>,
    current: Option<&ObjectId>,
    other: Option<&ObjectId>,
) -> MergeAction {
    let all = Presence::SPLIT | Presence::CURRENT | Presence::OTHER;

    match (Presence::of(split, current, other), split, current, other) {
        (presence, Some(s), Some(c), Some(o)) if presence == all => {
            if s == c && o != c {
                MergeAction::TakeOther
            } else if c != s && o != c && s != o {
                MergeAction::Conflict
            } else {
                MergeAction::Keep
            }
        }
        (presence, Some(s), Some(c), None) if presence == Presence::SPLIT | Presence::CURRENT => {
            if s == c {
                MergeAction::Remove
            } else {
                MergeAction::Conflict
            }
        }
        (presence, None, None, Some(_)) if presence == Presence::OTHER => MergeAction::TakeOther,
        (presence, Some(s), None, Some(o)) if presence == Presence::SPLIT | Presence::OTHER => {
            if s != o {
                MergeAction::Conflict
            } else {
                MergeAction::Keep
            }
        }
        (presence, None, Some(c), Some(o)) if presence == Presence::CURRENT | Presence::OTHER => {
            if c != o {
                MergeAction::Conflict
            } else {
                MergeAction::Keep
            }
        }
        _ => MergeAction::Keep,
    }
}

/// Conflict block written in place of a conflicted file
///
/// An absent side contributes nothing between its markers.
pub fn conflict_block(current: Option<&[u8]>, other: Option<&[u8]>) -> Vec<u8> {
    let mut block = b"<<<<<<< HEAD\n".to_vec();
    block.extend_from_slice(current.unwrap_or_default());
    block.extend_from_slice(b"=======\n");
    block.extend_from_slice(other.unwrap_or_default());
    block.extend_from_slice(b">>>>>>>\n");
    block
}
