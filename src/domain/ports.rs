use async_trait::async_trait;

use super::account::AccountState;
use super::errors::DomainError;
use super::invoice::{ExecuteMsg, ExecuteResult};

/// Signs and broadcasts a contract execute on behalf of `sender`.
#[async_trait]
pub trait ChainWriteClient: Send + Sync + 'static {
    async fn execute(
        &self,
        sender: &str,
        contract: &str,
        msg: &ExecuteMsg,
    ) -> Result<ExecuteResult, DomainError>;
}

pub trait AccountProvider {
    fn is_connected(&self) -> bool;
    fn address(&self) -> Option<&str>;
}

impl AccountProvider for AccountState {
    fn is_connected(&self) -> bool {
        self.is_connected
    }

    fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}

pub trait Navigator {
    fn push(&mut self, path: String);
}

/// Asks the wallet UI to show its connect dialog.
pub trait ConnectPrompt {
    fn show(&mut self);
}
