use uuid::Uuid;

use crate::domain::account::AccountState;
use crate::domain::errors::DomainError;
use crate::domain::invoice::{format_amount, DraftField, ExecuteMsg, ExecuteResult, InvoiceDraft, ItemField};
use crate::domain::outcome::SubmissionOutcome;
use crate::domain::ports::{AccountProvider, ChainWriteClient, ConnectPrompt, Navigator};

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Fixed destination of every execute call.
    pub contract_address: String,
    /// Link attached to a successful outcome.
    pub artifact_url: String,
    /// Reject a submit while the previous one is still in flight.
    pub guard_in_flight: bool,
}

/// Everything needed to issue the chain write for one submit attempt.
#[derive(Debug, Clone)]
pub struct PreparedSubmission {
    pub attempt_id: Uuid,
    pub sender: String,
    pub contract: String,
    pub msg: ExecuteMsg,
}

/// Owns the draft and the latest outcome for one form session.
///
/// Submission is split in two halves around the chain call so that a caller
/// holding the controller behind a lock can release it while the write is
/// pending: [`begin_submit`](Self::begin_submit) validates and builds the
/// message, [`finish_submit`](Self::finish_submit) records the result.
pub struct InvoiceController {
    draft: InvoiceDraft,
    outcome: SubmissionOutcome,
    last_account: AccountState,
    settings: ControllerSettings,
}

impl InvoiceController {
    pub fn new(settings: ControllerSettings) -> Self {
        Self {
            draft: InvoiceDraft::new(),
            outcome: SubmissionOutcome::default(),
            last_account: AccountState::disconnected(),
            settings,
        }
    }

    pub fn draft(&self) -> &InvoiceDraft {
        &self.draft
    }

    pub fn outcome(&self) -> &SubmissionOutcome {
        &self.outcome
    }

    pub fn total_text(&self) -> String {
        format_amount(&self.draft.total())
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.draft.set_field(field, value);
    }

    pub fn set_item_field(
        &mut self,
        index: usize,
        field: ItemField,
        value: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.draft.set_item_field(index, field, value)
    }

    pub fn add_item(&mut self) {
        self.draft.add_item();
    }

    pub fn remove_item(&mut self, index: usize) -> Result<bool, DomainError> {
        self.draft.remove_item(index)
    }

    /// Discard the draft and the outcome, as when the page is left.
    pub fn reset(&mut self) {
        self.draft = InvoiceDraft::new();
        self.outcome = SubmissionOutcome::default();
    }

    pub fn begin_submit<A: AccountProvider>(
        &mut self,
        client_present: bool,
        account: &A,
    ) -> Result<PreparedSubmission, DomainError> {
        if self.settings.guard_in_flight && self.outcome.is_in_progress() {
            return Err(DomainError::SubmissionInFlight);
        }

        let attempt_id = Uuid::new_v4();
        self.outcome = SubmissionOutcome::in_progress();

        let sender = match account.address() {
            Some(address) if client_present && !address.is_empty() => address.to_string(),
            _ => return Err(self.fail(attempt_id, DomainError::ClientOrAddressMissing)),
        };

        let msg = match self.draft.to_execute_msg() {
            Ok(msg) => msg,
            Err(e) => return Err(self.fail(attempt_id, e)),
        };

        Ok(PreparedSubmission {
            attempt_id,
            sender,
            contract: self.settings.contract_address.clone(),
            msg,
        })
    }

    pub fn finish_submit(
        &mut self,
        attempt: &PreparedSubmission,
        result: Result<ExecuteResult, DomainError>,
    ) -> &SubmissionOutcome {
        match result {
            Ok(res) => {
                log::info!(
                    "Invoice created (attempt {}, tx {})",
                    attempt.attempt_id,
                    res.transaction_hash
                );
                self.outcome = SubmissionOutcome::succeeded(self.settings.artifact_url.clone());
            }
            Err(e) => {
                self.fail(attempt.attempt_id, e);
            }
        }
        &self.outcome
    }

    /// Run a whole submit attempt while holding the controller exclusively.
    pub async fn submit<A: AccountProvider>(
        &mut self,
        client: Option<&dyn ChainWriteClient>,
        account: &A,
    ) -> &SubmissionOutcome {
        let prepared = match self.begin_submit(client.is_some(), account) {
            Ok(prepared) => prepared,
            Err(_) => return &self.outcome,
        };

        let result = match client {
            Some(client) => {
                client
                    .execute(&prepared.sender, &prepared.contract, &prepared.msg)
                    .await
            }
            None => Err(DomainError::ClientOrAddressMissing),
        };

        self.finish_submit(&prepared, result)
    }

    /// Push `/?address=<addr>` when the account pair changes into a connected
    /// state. Repeated observations of the same pair do nothing.
    pub fn observe_account<N: Navigator>(&mut self, account: &AccountState, navigator: &mut N) -> bool {
        if *account == self.last_account {
            return false;
        }
        self.last_account = account.clone();

        match account.linked_address() {
            Some(address) => {
                let path = format!("/?address={}", address);
                log::debug!("Account linked, navigating to {}", path);
                navigator.push(path);
                true
            }
            None => false,
        }
    }

    pub fn request_connect<P: ConnectPrompt>(&self, prompt: &mut P) {
        prompt.show();
    }

    fn fail(&mut self, attempt_id: Uuid, error: DomainError) -> DomainError {
        log::error!("Error creating invoice (attempt {}): {}", attempt_id, error);
        self.outcome = SubmissionOutcome::failed(&error);
        error
    }
}
