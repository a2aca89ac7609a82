//! Typed, numeric access to a mod's stored configuration for flowscript.
//!
//! A mod's settings are stored either in a flat Reloaded-II `Config.json` or in
//! a ReMIX value document described by a separate schema. The
//! [`resolution`] module finds the right store and turns a setting into the
//! int or float a script asked for; [`flow_functions`] exposes that as the
//! script-facing functions.

pub mod configuration;
pub mod flow_functions;
pub mod host;
pub mod logging;
pub mod resolution;

pub use flow_functions::FlowFunctions;
pub use host::{DirectoryModHost, ModHost};
pub use resolution::{ConfigResolver, NumericValue, ResolutionError, TypeResolver};
