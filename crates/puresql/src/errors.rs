use puresql_parser::LexError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no value bound for parameter ':{name}'")]
    MissingValue { name: String },

    #[error("no hook bound for generator ':{name}'")]
    MissingHook { name: String },

    #[error("parameter ':{name}' was never assigned a replacement")]
    MissingReplacement { name: String },

    #[error("parameter ':{name}' expects a list value")]
    ExpectedList { name: String },

    #[error("parameter ':{name}' expects a list of lists")]
    ExpectedListOfLists { name: String },

    #[error("generator ':{name}' exceeded {limit} levels of expansion; cyclic partial suspected")]
    CyclicGenerator { name: String, limit: usize },

    #[error("marker '-- name: {label}' reached resolution; split the token stream first")]
    UnexpectedName { label: String },

    #[error("generator ':{name}' returned a partial that does not tokenize:\n  {source}")]
    PartialLex {
        name: String,
        #[source]
        source: LexError,
    },

    #[error("failed to read template file: {path}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Lex(#[from] LexError),
}
