pub type LintResult<T> = Result<T, LintError>;

#[derive(thiserror::Error, Debug)]
pub enum LintError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("document error: {0}")]
    Document(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LintError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }
}
