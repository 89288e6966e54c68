//! # divvy
//!
//! divvy is a bill-splitting companion for group projects, and a library
//! for turning scanned receipt text into per-person totals. It also models
//! the surrounding app state: projects with photographed members, captured
//! group sessions with their attendance leaderboard and collaboration
//! graph, and a kanban ticket board.
#![doc(html_root_url = "https://docs.rs/divvy/0.1.0")]

pub mod board;
mod ledger;
pub mod parse;
pub mod project;
pub mod scan;
pub mod utils;

pub use ledger::*;
