use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (no storages, offset pair not distinct, etc.).
    ConfigValidation(String),
    /// A referenced storage does not exist or has no data.
    UnknownStorage(String),
    /// Quantity string is neither empty, integer, decimal, nor "a/b".
    QuantityParse { storage: String, record: String, value: String },
    /// Position value is not an integer.
    PositionParse { storage: String, record: String, value: String },
    /// Checked flag is not a boolean.
    CheckedParse { storage: String, record: String, value: String },
    /// Missing required column in a storage snapshot.
    MissingColumn { storage: String, column: String },
    /// IO error (file read, malformed CSV row, etc.).
    Io(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::UnknownStorage(storage) => write!(f, "unknown storage: {storage}"),
            Self::QuantityParse { storage, record, value } => {
                write!(f, "storage '{storage}', record '{record}': cannot parse quantity '{value}'")
            }
            Self::PositionParse { storage, record, value } => {
                write!(f, "storage '{storage}', record '{record}': cannot parse position '{value}'")
            }
            Self::CheckedParse { storage, record, value } => {
                write!(f, "storage '{storage}', record '{record}': cannot parse checked flag '{value}'")
            }
            Self::MissingColumn { storage, column } => {
                write!(f, "storage '{storage}': missing column '{column}'")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
