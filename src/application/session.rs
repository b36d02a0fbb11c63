use crate::domain::ports::{ConnectPrompt, Navigator};

/// Holds the most recent navigation target until it is handed to the client.
#[derive(Debug, Default)]
pub struct NavigationLog {
    pending: Option<String>,
}

impl NavigationLog {
    pub fn take(&mut self) -> Option<String> {
        self.pending.take()
    }
}

impl Navigator for NavigationLog {
    fn push(&mut self, path: String) {
        self.pending = Some(path);
    }
}

/// Set when the user asked to connect a wallet; cleared once an account is
/// reported.
#[derive(Debug, Default)]
pub struct ConnectRequest {
    requested: bool,
}

impl ConnectRequest {
    pub fn is_requested(&self) -> bool {
        self.requested
    }

    pub fn clear(&mut self) {
        self.requested = false;
    }
}

impl ConnectPrompt for ConnectRequest {
    fn show(&mut self) {
        log::debug!("Wallet connect requested");
        self.requested = true;
    }
}
