use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::account::AccountState;
use crate::domain::errors::DomainError;
use crate::domain::invoice::{DraftField, InvoiceDraft, ItemField};
use crate::domain::outcome::SubmissionOutcome;
use crate::domain::ports::ChainWriteClient;

use super::invoice_controller::{ControllerSettings, InvoiceController};
use super::session::{ConnectRequest, NavigationLog};

/// Read-only snapshot of the form session, rendered by the HTTP layer.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub draft: InvoiceDraft,
    pub total: String,
    pub can_remove_items: bool,
    pub outcome: SubmissionOutcome,
    pub account: AccountState,
    pub connect_requested: bool,
    /// Navigation triggered by the request that produced this view, if any.
    pub navigate_to: Option<String>,
}

struct Session {
    controller: InvoiceController,
    account: AccountState,
    navigation: NavigationLog,
    connect: ConnectRequest,
}

impl Session {
    fn view(&self) -> SessionView {
        SessionView {
            draft: self.controller.draft().clone(),
            total: self.controller.total_text(),
            can_remove_items: self.controller.draft().can_remove_items(),
            outcome: self.controller.outcome().clone(),
            account: self.account.clone(),
            connect_requested: self.connect.is_requested(),
            navigate_to: None,
        }
    }
}

/// Single owner of the form session. Every mutation goes through one async
/// mutex; the lock is released while the chain write is awaited.
pub struct InvoiceService {
    session: Mutex<Session>,
    client: Option<Arc<dyn ChainWriteClient>>,
}

impl InvoiceService {
    pub fn new(settings: ControllerSettings, client: Option<Arc<dyn ChainWriteClient>>) -> Self {
        Self {
            session: Mutex::new(Session {
                controller: InvoiceController::new(settings),
                account: AccountState::disconnected(),
                navigation: NavigationLog::default(),
                connect: ConnectRequest::default(),
            }),
            client,
        }
    }

    pub async fn view(&self) -> SessionView {
        self.session.lock().await.view()
    }

    pub async fn set_field(&self, field: DraftField, value: String) -> SessionView {
        let mut session = self.session.lock().await;
        session.controller.set_field(field, value);
        session.view()
    }

    pub async fn set_item_field(
        &self,
        index: usize,
        field: ItemField,
        value: String,
    ) -> Result<SessionView, DomainError> {
        let mut session = self.session.lock().await;
        session.controller.set_item_field(index, field, value)?;
        Ok(session.view())
    }

    pub async fn add_item(&self) -> SessionView {
        let mut session = self.session.lock().await;
        session.controller.add_item();
        session.view()
    }

    pub async fn remove_item(&self, index: usize) -> Result<SessionView, DomainError> {
        let mut session = self.session.lock().await;
        session.controller.remove_item(index)?;
        Ok(session.view())
    }

    pub async fn reset(&self) -> SessionView {
        let mut session = self.session.lock().await;
        session.controller.reset();
        session.view()
    }

    /// Run one submit attempt. Only an in-flight rejection is returned as an
    /// error; every other failure is reported through the outcome.
    pub async fn submit(&self) -> Result<SubmissionOutcome, DomainError> {
        let prepared = {
            let mut session = self.session.lock().await;
            let Session {
                controller,
                account,
                ..
            } = &mut *session;
            match controller.begin_submit(self.client.is_some(), &*account) {
                Ok(prepared) => prepared,
                Err(DomainError::SubmissionInFlight) => {
                    return Err(DomainError::SubmissionInFlight)
                }
                Err(_) => return Ok(controller.outcome().clone()),
            }
        };

        let result = match self.client.as_deref() {
            Some(client) => {
                client
                    .execute(&prepared.sender, &prepared.contract, &prepared.msg)
                    .await
            }
            None => Err(DomainError::ClientOrAddressMissing),
        };

        let mut session = self.session.lock().await;
        Ok(session.controller.finish_submit(&prepared, result).clone())
    }

    /// Record what the account provider reports. Navigation is handed back in
    /// the returned view exactly once, on the transition into a connected
    /// account.
    pub async fn update_account(&self, account: AccountState) -> SessionView {
        let mut session = self.session.lock().await;
        let Session {
            controller,
            navigation,
            connect,
            ..
        } = &mut *session;

        controller.observe_account(&account, &mut *navigation);
        if account.linked_address().is_some() {
            connect.clear();
        }
        let navigate_to = navigation.take();

        session.account = account;
        SessionView {
            navigate_to,
            ..session.view()
        }
    }

    pub async fn request_connect(&self) -> SessionView {
        let mut session = self.session.lock().await;
        let Session {
            controller, connect, ..
        } = &mut *session;
        controller.request_connect(connect);
        session.view()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::invoice::{ExecuteMsg, ExecuteResult};
    use crate::domain::outcome::SubmissionStatus;

    struct SlowClient;

    #[async_trait]
    impl ChainWriteClient for SlowClient {
        async fn execute(
            &self,
            _sender: &str,
            _contract: &str,
            _msg: &ExecuteMsg,
        ) -> Result<ExecuteResult, DomainError> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(ExecuteResult {
                transaction_hash: "0xslow".into(),
                height: 1,
                gas_used: 1,
            })
        }
    }

    fn service(guard_in_flight: bool, client: Option<Arc<dyn ChainWriteClient>>) -> InvoiceService {
        InvoiceService::new(
            ControllerSettings {
                contract_address: "xion1contract".into(),
                artifact_url: "https://example.com/invoice.pdf".into(),
                guard_in_flight,
            },
            client,
        )
    }

    async fn fill(svc: &InvoiceService) {
        svc.set_field(DraftField::Payer, "abc1".into()).await;
        svc.set_field(DraftField::Recipient, "xyz2".into()).await;
        svc.set_item_field(0, ItemField::ItemPrice, "10".into())
            .await
            .unwrap();
        svc.update_account(AccountState::connected("xion1sender")).await;
    }

    #[tokio::test]
    async fn view_reflects_edits() {
        let svc = service(false, None);
        svc.add_item().await;
        svc.set_item_field(1, ItemField::ItemPrice, "2.5".into())
            .await
            .unwrap();
        let view = svc.set_item_field(0, ItemField::ItemPrice, "1".into()).await.unwrap();

        assert_eq!(view.total, "3.5");
        assert!(view.can_remove_items);
        assert_eq!(view.draft.items().len(), 2);
    }

    #[tokio::test]
    async fn submit_without_client_fails_with_precondition_message() {
        let svc = service(false, None);
        fill(&svc).await;

        let outcome = svc.submit().await.unwrap();

        assert_eq!(outcome.status, SubmissionStatus::Failed);
        assert_eq!(outcome.message, "Client or address missing.");
    }

    #[tokio::test]
    async fn state_is_readable_while_write_is_pending() {
        let svc = Arc::new(service(false, Some(Arc::new(SlowClient))));
        fill(&svc).await;

        let pending = tokio::spawn({
            let svc = svc.clone();
            async move { svc.submit().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(svc.view().await.outcome.is_in_progress());

        let outcome = pending.await.unwrap().unwrap();
        assert_eq!(outcome.status, SubmissionStatus::Succeeded);
    }

    #[tokio::test]
    async fn guard_rejects_second_submit_while_pending() {
        let svc = Arc::new(service(true, Some(Arc::new(SlowClient))));
        fill(&svc).await;

        let (first, second) = futures::join!(svc.submit(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            svc.submit().await
        });

        assert_eq!(first.unwrap().status, SubmissionStatus::Succeeded);
        assert!(matches!(second, Err(DomainError::SubmissionInFlight)));
    }

    #[tokio::test]
    async fn account_update_hands_out_navigation_once() {
        let svc = service(false, None);
        svc.request_connect().await;

        let first = svc.update_account(AccountState::connected("xion1me")).await;
        let second = svc.update_account(AccountState::connected("xion1me")).await;

        assert_eq!(first.navigate_to.as_deref(), Some("/?address=xion1me"));
        assert!(!first.connect_requested);
        assert!(second.navigate_to.is_none());
        assert_eq!(svc.view().await.account.address.as_deref(), Some("xion1me"));
    }
}
