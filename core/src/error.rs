use thiserror::Error;

/// Failure to read a register or key name typed by a person.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown register `{0}`")]
    Register(String),
    #[error("unknown key `{0}`")]
    Key(String),
}
