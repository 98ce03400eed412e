use thiserror::Error;

use crate::dom::ElementId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RectError {
    #[error("rectangle input is not an object")]
    NotAnObject,
    #[error("missing rectangle field `{0}`")]
    MissingField(&'static str),
    #[error("rectangle field `{0}` is not a number")]
    NotANumber(&'static str),
    #[error("unrecognized rectangle shape")]
    UnknownShape,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarkupError {
    #[error("unterminated tag starting at byte {0}")]
    UnterminatedTag(usize),
    #[error("unterminated comment starting at byte {0}")]
    UnterminatedComment(usize),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GestureError {
    #[error("gesture target {0:?} is not in the document")]
    MissingElement(ElementId),
    #[error("none of the requested gesture handles exist")]
    NoHandles,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("container element `{0}` not found")]
    MissingContainer(String),
    #[error("container element `{0}` is already managed")]
    AlreadyInitialized(String),
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("invalid value for option `{key}`: {source}")]
    InvalidValue {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no data available for `{0}`")]
    NotFound(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("payload is not a pane spec: {0}")]
    Decode(#[from] serde_json::Error),
}
