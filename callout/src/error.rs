use hashcash_types::HashcashError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalloutError {
    /// A property is missing, empty, or has an unusable value.
    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Hashcash(#[from] HashcashError),
}

impl CalloutError {
    pub fn config(msg: impl Into<String>) -> Self {
        CalloutError::Config(msg.into())
    }

    /// Short type name, used for the `exception` output variable.
    pub fn kind(&self) -> &'static str {
        match self {
            CalloutError::Config(_) => "ConfigError",
            CalloutError::Hashcash(HashcashError::Format(_)) => "FormatError",
            CalloutError::Hashcash(HashcashError::Validation(_)) => "ValidationError",
            CalloutError::Hashcash(HashcashError::UnsupportedHashFunction(_)) => {
                "UnsupportedHashFunction"
            }
            CalloutError::Hashcash(HashcashError::Cancelled) => "Cancelled",
        }
    }
}
