//! Store Module
//!
//! Flat-file persistence for an ordered list of text lines.
//!
//! ## Responsibilities
//! - Create the backing file on first open, never clobbering existing data
//! - Load every line in file order
//! - Replace the whole file atomically on save
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────┐
//! │ line 0 \n                    │
//! ├──────────────────────────────┤
//! │ line 1 \n                    │
//! ├──────────────────────────────┤
//! │ ...                          │
//! └──────────────────────────────┘
//! ```
//!
//! Saves go through a sibling `<name>.tmp` file which is synced and then
//! renamed over the target, so a reader never observes a half-written file.

mod record_store;

pub use record_store::RecordStore;
