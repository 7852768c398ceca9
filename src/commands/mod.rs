//! Command palette backend for Marknote
//!
//! - `registry.rs` - `Command`, `CommandAction`, and ranked search
//! - `fuzzy.rs` - weighted fuzzy field scoring
//! - `recent.rs` - persisted recently-executed list
//! - `builtin.rs` - the commands shipped with the editor

mod builtin;
mod fuzzy;
mod recent;
mod registry;

pub use builtin::builtin_commands;
pub use registry::{Command, CommandAction, CommandRegistry};
