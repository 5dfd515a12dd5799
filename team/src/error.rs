use teamforge_dex::MissingReference;
use thiserror::Error;

/// Errors from reading a team paste
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid set header on line {line}: {text}")]
    InvalidHeader { line: usize, text: String },

    #[error("Invalid stat spread on line {line}: {text}")]
    InvalidSpread { line: usize, text: String },

    #[error("Invalid level on line {line}: {text}")]
    InvalidLevel { line: usize, text: String },

    #[error("Unrecognized line {line}: {text}")]
    UnrecognizedLine { line: usize, text: String },

    #[error("Empty paste")]
    EmptyPaste,
}

/// Errors from turning a pasted set into a build
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error(transparent)]
    Missing(#[from] MissingReference),

    #[error("Species {0} has no abilities and none was given")]
    NoAbility(String),
}

/// Either half of [`import_roster`](crate::import_roster) failing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
