//! CLI Exit Code Registry
//!
//! Single source of truth for all CLI exit codes. Exit codes are part of
//! the shell contract — scripts rely on them.
//!
//! | Code | Description                                      |
//! |------|--------------------------------------------------|
//! | 0    | Success                                          |
//! | 1    | General error (unspecified)                      |
//! | 2    | CLI usage error (bad args, missing file)         |
//! | 3    | Invalid config (TOML parse or validation)        |
//! | 4    | Unknown storage                                  |
//! | 5    | Record parse error (quantity, position, column)  |
//! | 6    | IO error (unreadable config or storage file)     |
//!
//! When adding a code: add the constant, document what triggers it, update
//! the table, and wire it into `engine_exit_code` if it maps an engine
//! error.

use larder_engine::EngineError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
#[allow(dead_code)]
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
/// Emitted by clap itself; listed here so the registry is complete.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

/// Config rejected: TOML parse failure or validation failure.
pub const EXIT_CONFIG: u8 = 3;

/// A named storage is not in the config, or has no data.
pub const EXIT_UNKNOWN_STORAGE: u8 = 4;

/// A storage snapshot failed to parse (bad quantity, position, checked
/// flag, or a missing column).
pub const EXIT_PARSE: u8 = 5;

/// IO error reading the config or a storage file.
pub const EXIT_IO: u8 = 6;

/// Map an engine error to its exit code.
pub fn engine_exit_code(err: &EngineError) -> u8 {
    match err {
        EngineError::ConfigParse(_) | EngineError::ConfigValidation(_) => EXIT_CONFIG,
        EngineError::UnknownStorage(_) => EXIT_UNKNOWN_STORAGE,
        EngineError::QuantityParse { .. }
        | EngineError::PositionParse { .. }
        | EngineError::CheckedParse { .. }
        | EngineError::MissingColumn { .. } => EXIT_PARSE,
        EngineError::Io(_) => EXIT_IO,
    }
}
