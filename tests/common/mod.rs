#![allow(dead_code)]

pub mod command;
pub mod file;

/// Conflict block written for a file both branches changed
pub fn conflict_block(current: &str, other: &str) -> String {
    format!("<<<<<<< HEAD\n{current}=======\n{other}>>>>>>>\n")
}
