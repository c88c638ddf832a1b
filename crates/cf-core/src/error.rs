use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct CaseFileError {
    pub code: String,
    pub message: String,
}

impl CaseFileError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unknown_tab(raw: &str) -> Self {
        Self::new("NAV_UNKNOWN_TAB", format!("Unknown tab id \"{}\".", raw))
    }
}
