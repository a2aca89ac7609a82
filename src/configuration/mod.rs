//! Host-side configuration: where the mod loader keeps mods and their user
//! configuration, which mods are enabled, and how to log.
//!
//! Your starting point should probably be [`Configuration::load_from_default_path`].
//!
//! # Internals
//! The configuration file is first deserialized into the unvalidated
//! ("unresolved") [`UnresolvedConfiguration`] structure. Its `resolve` method
//! then recursively turns it (and its tables) into validated ("resolved")
//! versions, expanding path placeholders such as `{BASE_DATA_DIRECTORY}` and
//! rejecting invalid log filters or mod ids along the way.
//!
//! The output of that process is the [`Configuration`].

#![allow(rustdoc::private_intra_doc_links)]

mod structure;
mod traits;
mod utilities;

pub use structure::*;
