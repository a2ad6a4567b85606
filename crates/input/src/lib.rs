//! Input mapping: raw key edges to high-level actions.
//!
//! # Invariants
//! - The scene consumes actions, never raw key events.
//! - Held controls report both edges; one-shot controls fire on press only.

pub mod action;
pub mod keymap;

pub use action::{Action, Control};
pub use keymap::{Key, KeyBindings};

pub fn crate_info() -> &'static str {
    "mazewalk-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
