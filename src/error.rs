use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unexpected end of JSON input")]
    EmptyInput,
    #[error("SyntaxError: Unexpected token {0} in JSON")]
    UnexpectedToken(String),
    #[error("SyntaxError: Unexpected end of JSON input")]
    UnexpectedEnd,
    #[error("SyntaxError: nesting deeper than {0} levels")]
    NestingTooDeep(usize),
    #[error("Operation not permitted")]
    OperationNotPermitted,
    /// Top-level `null` or `undefined` handed to `stringify`.
    #[error("{0}")]
    NullOrUndefined(&'static str),
}

impl Error {
    pub(crate) fn unexpected(token: &str) -> Self {
        Error::UnexpectedToken(token.to_string())
    }

    /// True for every failure caused by malformed JSON text.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Error::EmptyInput
                | Error::UnexpectedToken(_)
                | Error::UnexpectedEnd
                | Error::NestingTooDeep(_)
        )
    }
}
