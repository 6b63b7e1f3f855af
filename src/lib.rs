//! # zen
//!
//! An abbreviation expansion engine for markup templates.
//!
//! An abbreviation such as `ul>li.item$*3` is lexed, parsed into a tree, expanded into
//! concrete generation nodes and rendered through a generator and a filter chain into one
//! composite template with placeholder variables. See the [zen module](zen) for the pipeline.
//!
//! ## Testing
//!
//! Expansion results are verified with the fluent assertions in [testing](zen::testing).

pub mod zen;
