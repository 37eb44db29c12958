use super::{
    logic::{AccountLogic, AccountLogicError},
    Registration,
};

/// Accepts every validated registration without side effects.
///
/// Storing the account, hashing the password and detecting duplicate
/// usernames or emails belong to a future implementation of
/// `AccountLogic`; this one only completes the request.
#[derive(Debug, Default, Clone)]
pub struct AccountService;

impl AccountService {
    pub fn new() -> Self {
        Self
    }
}

impl AccountLogic for AccountService {
    fn register(&self, _registration: Registration) -> Result<(), AccountLogicError> {
        Ok(())
    }
}
