// config.rs: Compile-time configuration constants and environment overrides.
//
// Runtime overrides follow a two-step pattern: `init_x()` reads the process
// environment, `init_x_from(Option<&str>)` holds the parsing so it can be
// unit-tested without touching the environment. Command-line flags take
// precedence over both.

// Suffix appended to compressed files and stripped on decompression.
pub const LZO_EXTENSION: &str = ".lzo";

// Growth step of the decompression output buffer, in bytes.
pub const DEFAULT_GROWTH_BLOCK_SIZE: usize = crate::block::types::OUTPUT_BLOCK_SIZE;

// Default number of worker threads for multi-file and multi-block work.
// 0 = let rayon pick (one per logical CPU).
// Can be overridden by the LZO_NBWORKERS environment variable,
// or by the -T# command-line flag.
pub const NB_WORKERS_DEFAULT: usize = 0;

// Maximum number of worker threads selectable at runtime.
pub const NB_WORKERS_MAX: usize = 200;

// Default display level: 0 silent, 1 errors, 2 results, 3 progress, 4 debug.
// Can be overridden by the LZO_DISPLAY_LEVEL environment variable,
// or by -v / -q on the command line.
pub const DISPLAY_LEVEL_DEFAULT: u32 = 2;

// Highest meaningful display level.
pub const DISPLAY_LEVEL_MAX: u32 = 4;

// Default number of timing iterations for `lzo -b`.
pub const BENCH_ITERATIONS_DEFAULT: u32 = 3;

pub const ENV_NBWORKERS: &str = "LZO_NBWORKERS";
pub const ENV_DISPLAY_LEVEL: &str = "LZO_DISPLAY_LEVEL";

/// Parse a leading run of decimal digits; `None` when the value does not
/// start with a digit or overflows.
fn leading_u32(s: &str) -> Option<u32> {
    let digits: &str = {
        let end = s
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        &s[..end]
    };
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Read the worker count from `LZO_NBWORKERS`.
pub fn init_nb_workers() -> usize {
    init_nb_workers_from(std::env::var(ENV_NBWORKERS).ok().as_deref())
}

/// Testable core of [`init_nb_workers`]. Values are clamped to
/// [`NB_WORKERS_MAX`]; anything unparsable yields [`NB_WORKERS_DEFAULT`].
pub fn init_nb_workers_from(env_val: Option<&str>) -> usize {
    match env_val.and_then(leading_u32) {
        Some(n) => (n as usize).min(NB_WORKERS_MAX),
        None => NB_WORKERS_DEFAULT,
    }
}

/// Read the display level from `LZO_DISPLAY_LEVEL`.
pub fn init_display_level() -> u32 {
    init_display_level_from(std::env::var(ENV_DISPLAY_LEVEL).ok().as_deref())
}

/// Testable core of [`init_display_level`]. Values are clamped to
/// [`DISPLAY_LEVEL_MAX`].
pub fn init_display_level_from(env_val: Option<&str>) -> u32 {
    match env_val.and_then(leading_u32) {
        Some(n) => n.min(DISPLAY_LEVEL_MAX),
        None => DISPLAY_LEVEL_DEFAULT,
    }
}
