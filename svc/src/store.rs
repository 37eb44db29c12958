use libsvc::domain::account::logic::AccountLogic;
use std::sync::Arc;

#[derive(Clone)]
pub struct Store {
    pub account_logic: Arc<dyn AccountLogic + Send + Sync>,
}

impl Store {
    pub fn new(account_logic: Arc<dyn AccountLogic + Send + Sync>) -> Self {
        Self { account_logic }
    }
}
