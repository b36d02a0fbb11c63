/// Snapshot of what the wallet account provider reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountState {
    pub is_connected: bool,
    pub address: Option<String>,
}

impl AccountState {
    pub fn connected(address: impl Into<String>) -> Self {
        Self {
            is_connected: true,
            address: Some(address.into()),
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    /// The address to link, only while connected with a non-empty address.
    pub fn linked_address(&self) -> Option<&str> {
        match (self.is_connected, self.address.as_deref()) {
            (true, Some(address)) if !address.is_empty() => Some(address),
            _ => None,
        }
    }
}
