use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::invoice_service::{InvoiceService, SessionView};
use crate::domain::account::AccountState;
use crate::domain::invoice::{DraftField, InvoiceDraft, ItemField};
use crate::domain::outcome::{SubmissionOutcome, SubmissionStatus};
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetValueRequest {
    pub value: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub is_connected: bool,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItemResponse {
    pub item_name: String,
    pub item_price: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    pub payer: String,
    pub recipient: String,
    pub description: String,
    /// `YYYY-MM-DD` as entered.
    pub due_date: String,
    pub items: Vec<LineItemResponse>,
}

impl From<&InvoiceDraft> for DraftResponse {
    fn from(draft: &InvoiceDraft) -> Self {
        Self {
            payer: draft.payer().to_string(),
            recipient: draft.recipient().to_string(),
            description: draft.description().to_string(),
            due_date: draft.due_date().to_string(),
            items: draft
                .items()
                .iter()
                .map(|i| LineItemResponse {
                    item_name: i.item_name.clone(),
                    item_price: i.item_price.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum StatusResponse {
    None,
    InProgress,
    Succeeded,
    Failed,
}

impl From<SubmissionStatus> for StatusResponse {
    fn from(status: SubmissionStatus) -> Self {
        match status {
            SubmissionStatus::None => StatusResponse::None,
            SubmissionStatus::InProgress => StatusResponse::InProgress,
            SubmissionStatus::Succeeded => StatusResponse::Succeeded,
            SubmissionStatus::Failed => StatusResponse::Failed,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeResponse {
    pub status: StatusResponse,
    pub message: String,
    /// Download link, present only after a successful submit.
    pub artifact_url: Option<String>,
}

impl From<&SubmissionOutcome> for OutcomeResponse {
    fn from(outcome: &SubmissionOutcome) -> Self {
        Self {
            status: outcome.status.into(),
            message: outcome.message.clone(),
            artifact_url: outcome.artifact_url.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub is_connected: bool,
    pub address: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceViewResponse {
    pub draft: DraftResponse,
    /// Sum of item prices as decimal text; unparsable prices count as zero.
    pub total: String,
    /// Whether a remove control should be offered for each item.
    pub can_remove_items: bool,
    pub outcome: OutcomeResponse,
    pub account: AccountResponse,
    pub connect_requested: bool,
    /// Location the page should move to, set once per wallet connection.
    pub navigate_to: Option<String>,
}

impl From<SessionView> for InvoiceViewResponse {
    fn from(view: SessionView) -> Self {
        Self {
            draft: DraftResponse::from(&view.draft),
            total: view.total,
            can_remove_items: view.can_remove_items,
            outcome: OutcomeResponse::from(&view.outcome),
            account: AccountResponse {
                is_connected: view.account.is_connected,
                address: view.account.address,
            },
            connect_requested: view.connect_requested,
            navigate_to: view.navigate_to,
        }
    }
}

fn render(view: SessionView) -> HttpResponse {
    HttpResponse::Ok().json(InvoiceViewResponse::from(view))
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /invoice
///
/// Current draft, derived total, latest outcome and account state.
#[utoipa::path(
    get,
    path = "/invoice",
    responses(
        (status = 200, description = "Current form session", body = InvoiceViewResponse),
    ),
    tag = "invoice"
)]
pub async fn get_invoice(svc: web::Data<InvoiceService>) -> Result<HttpResponse, AppError> {
    Ok(render(svc.view().await))
}

/// PUT /invoice/fields/{field}
///
/// Replace one of `payer`, `recipient`, `description` or `dueDate`. No
/// validation happens until submit.
#[utoipa::path(
    put,
    path = "/invoice/fields/{field}",
    params(
        ("field" = String, Path, description = "payer | recipient | description | dueDate"),
    ),
    request_body = SetValueRequest,
    responses(
        (status = 200, description = "Field updated", body = InvoiceViewResponse),
        (status = 400, description = "Unknown field"),
    ),
    tag = "invoice"
)]
pub async fn set_field(
    svc: web::Data<InvoiceService>,
    path: web::Path<String>,
    body: web::Json<SetValueRequest>,
) -> Result<HttpResponse, AppError> {
    let field: DraftField = path.into_inner().parse()?;
    Ok(render(svc.set_field(field, body.into_inner().value).await))
}

/// PUT /invoice/items/{index}/{field}
#[utoipa::path(
    put,
    path = "/invoice/items/{index}/{field}",
    params(
        ("index" = usize, Path, description = "Zero-based position of the line item"),
        ("field" = String, Path, description = "itemName | itemPrice"),
    ),
    request_body = SetValueRequest,
    responses(
        (status = 200, description = "Item updated", body = InvoiceViewResponse),
        (status = 400, description = "Unknown field"),
        (status = 404, description = "No item at that index"),
    ),
    tag = "invoice"
)]
pub async fn set_item_field(
    svc: web::Data<InvoiceService>,
    path: web::Path<(usize, String)>,
    body: web::Json<SetValueRequest>,
) -> Result<HttpResponse, AppError> {
    let (index, field) = path.into_inner();
    let field: ItemField = field.parse()?;
    let view = svc
        .set_item_field(index, field, body.into_inner().value)
        .await?;
    Ok(render(view))
}

/// POST /invoice/items
///
/// Append a blank line item.
#[utoipa::path(
    post,
    path = "/invoice/items",
    responses(
        (status = 200, description = "Item appended", body = InvoiceViewResponse),
    ),
    tag = "invoice"
)]
pub async fn add_item(svc: web::Data<InvoiceService>) -> Result<HttpResponse, AppError> {
    Ok(render(svc.add_item().await))
}

/// DELETE /invoice/items/{index}
///
/// Remove a line item. Removing the only remaining item leaves the draft
/// unchanged.
#[utoipa::path(
    delete,
    path = "/invoice/items/{index}",
    params(
        ("index" = usize, Path, description = "Zero-based position of the line item"),
    ),
    responses(
        (status = 200, description = "Item removed, or kept because it is the last one", body = InvoiceViewResponse),
        (status = 404, description = "No item at that index"),
    ),
    tag = "invoice"
)]
pub async fn remove_item(
    svc: web::Data<InvoiceService>,
    path: web::Path<usize>,
) -> Result<HttpResponse, AppError> {
    Ok(render(svc.remove_item(path.into_inner()).await?))
}

/// DELETE /invoice
///
/// Discard the draft and the last outcome.
#[utoipa::path(
    delete,
    path = "/invoice",
    responses(
        (status = 200, description = "Fresh draft", body = InvoiceViewResponse),
    ),
    tag = "invoice"
)]
pub async fn reset_invoice(svc: web::Data<InvoiceService>) -> Result<HttpResponse, AppError> {
    Ok(render(svc.reset().await))
}

/// POST /invoice/submit
///
/// Validate the draft and send `CreateInvoice` to the contract. Failed
/// attempts still answer 200; the outcome carries the user-facing message.
#[utoipa::path(
    post,
    path = "/invoice/submit",
    responses(
        (status = 200, description = "Attempt resolved", body = OutcomeResponse),
        (status = 409, description = "Another submit is still in flight"),
    ),
    tag = "invoice"
)]
pub async fn submit_invoice(svc: web::Data<InvoiceService>) -> Result<HttpResponse, AppError> {
    let outcome = svc.submit().await?;
    Ok(HttpResponse::Ok().json(OutcomeResponse::from(&outcome)))
}

/// PUT /account
///
/// Report the wallet connection state. The response carries `navigateTo`
/// once, when the account becomes connected.
#[utoipa::path(
    put,
    path = "/account",
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account recorded", body = InvoiceViewResponse),
    ),
    tag = "account"
)]
pub async fn update_account(
    svc: web::Data<InvoiceService>,
    body: web::Json<UpdateAccountRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let account = AccountState {
        is_connected: body.is_connected,
        address: body.address,
    };
    Ok(render(svc.update_account(account).await))
}

/// POST /account/connect
///
/// Ask the wallet UI to show its connect dialog.
#[utoipa::path(
    post,
    path = "/account/connect",
    responses(
        (status = 200, description = "Connect requested", body = InvoiceViewResponse),
    ),
    tag = "account"
)]
pub async fn connect_wallet(svc: web::Data<InvoiceService>) -> Result<HttpResponse, AppError> {
    Ok(render(svc.request_connect().await))
}
