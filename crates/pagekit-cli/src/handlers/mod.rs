//! Command handlers - extracted from main.rs for testability
//!
//! Each handler module holds the execution logic for one command plus the
//! pure helpers it is built from.

pub mod check;
pub mod list;
pub mod resolve;

pub use check::{check_file, execute_check, FileReport};
pub use list::{execute_list, summarize, ElementSummary};
pub use resolve::{execute_resolve, locate_file, resolve_element, ResolvedLocator};
