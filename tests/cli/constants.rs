// Unit tests for cli/constants.rs: identity strings and the display level.

use lzo1x::cli::constants::{display_level, set_display_level, PROGRAM_NAME};

#[test]
fn program_name() {
    assert_eq!(PROGRAM_NAME, "lzo");
}

#[test]
fn display_level_roundtrip() {
    let saved = display_level();
    set_display_level(4);
    assert_eq!(display_level(), 4);
    lzo1x::displaylevel!(5, "never printed\n");
    set_display_level(saved);
    assert_eq!(display_level(), saved);
}
