//! Command-line interface for the `lzo` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity, the `DISPLAY_LEVEL` global and the display macros. |
//! | [`op_mode`]   | `OpMode` and extension-based mode inference. |
//! | [`args`]      | `ParsedArgs`: clap parsing resolved against environment defaults. |
//!
//! Typical call sequence: `parse_args` → `set_display_level` → dispatch to the I/O layer.

pub mod constants;
pub mod op_mode;
pub mod args;
