use std::{error::Error, fmt::Display};

use super::Registration;

#[derive(Debug, PartialEq)]
pub enum AccountLogicError {
    Other(String),
}

impl Display for AccountLogicError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountLogicError::Other(err) => write!(f, "{}", err),
        }
    }
}

impl Error for AccountLogicError {}

impl From<&str> for AccountLogicError {
    fn from(value: &str) -> Self {
        AccountLogicError::Other(value.to_owned())
    }
}

impl From<String> for AccountLogicError {
    fn from(value: String) -> Self {
        AccountLogicError::Other(value)
    }
}

/// Business logic that's to be implemented by every account provider.
pub trait AccountLogic {
    /// Registers a new account from an already validated request.
    fn register(&self, registration: Registration) -> Result<(), AccountLogicError>;
}
