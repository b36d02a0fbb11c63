use std::str::FromStr;
use std::sync::OnceLock;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ── Draft ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineItem {
    pub item_name: String,
    /// Decimal text as typed; may be empty or non-numeric while editing.
    pub item_price: String,
}

/// Scalar fields of the draft that can be replaced wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Payer,
    Recipient,
    Description,
    DueDate,
}

impl FromStr for DraftField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payer" => Ok(DraftField::Payer),
            "recipient" => Ok(DraftField::Recipient),
            "description" => Ok(DraftField::Description),
            "dueDate" => Ok(DraftField::DueDate),
            other => Err(DomainError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    ItemName,
    ItemPrice,
}

impl FromStr for ItemField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "itemName" => Ok(ItemField::ItemName),
            "itemPrice" => Ok(ItemField::ItemPrice),
            other => Err(DomainError::UnknownField(other.to_string())),
        }
    }
}

/// In-progress invoice data edited by a single form session.
///
/// `items` is never empty: the draft starts with one blank line item and
/// refuses to remove the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    payer: String,
    recipient: String,
    description: String,
    due_date: String,
    items: Vec<LineItem>,
}

impl Default for InvoiceDraft {
    fn default() -> Self {
        Self {
            payer: String::new(),
            recipient: String::new(),
            description: String::new(),
            due_date: String::new(),
            items: vec![LineItem::default()],
        }
    }
}

impl InvoiceDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payer(&self) -> &str {
        &self.payer
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn due_date(&self) -> &str {
        &self.due_date
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::Payer => self.payer = value,
            DraftField::Recipient => self.recipient = value,
            DraftField::Description => self.description = value,
            DraftField::DueDate => self.due_date = value,
        }
    }

    pub fn set_item_field(
        &mut self,
        index: usize,
        field: ItemField,
        value: impl Into<String>,
    ) -> Result<(), DomainError> {
        let item = self
            .items
            .get_mut(index)
            .ok_or(DomainError::ItemNotFound(index))?;
        match field {
            ItemField::ItemName => item.item_name = value.into(),
            ItemField::ItemPrice => item.item_price = value.into(),
        }
        Ok(())
    }

    pub fn add_item(&mut self) {
        self.items.push(LineItem::default());
    }

    /// Removes the item at `index`. Returns `Ok(false)` without touching the
    /// draft when it is the only item left.
    pub fn remove_item(&mut self, index: usize) -> Result<bool, DomainError> {
        if index >= self.items.len() {
            return Err(DomainError::ItemNotFound(index));
        }
        if !self.can_remove_items() {
            return Ok(false);
        }
        self.items.remove(index);
        Ok(true)
    }

    pub fn can_remove_items(&self) -> bool {
        self.items.len() > 1
    }

    /// Sum of all item prices; unparsable prices count as zero.
    pub fn total(&self) -> BigDecimal {
        self.items
            .iter()
            .fold(BigDecimal::zero(), |sum, item| sum + parse_price(&item.item_price))
    }

    /// Validate both addresses and build the contract message for this draft.
    ///
    /// The payer is checked but not sent; the contract only receives the
    /// recipient.
    pub fn to_execute_msg(&self) -> Result<ExecuteMsg, DomainError> {
        if !is_valid_address(&self.recipient) || !is_valid_address(&self.payer) {
            return Err(DomainError::InvalidAddressFormat);
        }

        Ok(ExecuteMsg::CreateInvoice(CreateInvoice {
            recipient: self.recipient.to_lowercase(),
            amount: format_amount(&self.total()),
            description: self.description.clone(),
            due_date: due_date_millis(&self.due_date),
        }))
    }
}

// ── Rules ────────────────────────────────────────────────────────────────────

/// Placeholder address check: non-empty, lowercase ASCII letters and digits
/// only. No bech32 prefix or checksum validation happens here.
pub fn is_valid_address(address: &str) -> bool {
    static ADDRESS: OnceLock<Regex> = OnceLock::new();
    ADDRESS
        .get_or_init(|| Regex::new(r"^[a-z0-9]+$").expect("address pattern is valid"))
        .is_match(address)
}

/// Largest decimal exponent, either way, a price may carry. Beyond it the
/// text counts as non-numeric.
pub const MAX_PRICE_SCALE: i64 = 64;

/// Price text as a decimal; empty, non-numeric or out-of-range text is zero.
pub fn parse_price(text: &str) -> BigDecimal {
    match BigDecimal::from_str(text.trim()) {
        Ok(price) if price.as_bigint_and_exponent().1.abs() <= MAX_PRICE_SCALE => price,
        _ => BigDecimal::zero(),
    }
}

/// Shortest plain decimal rendering of `amount`: "350.5", "1200",
/// "0.0000001". Never "350.50" or exponent notation.
pub fn format_amount(amount: &BigDecimal) -> String {
    let normalized = amount.normalized();
    let sign = if normalized < BigDecimal::zero() { "-" } else { "" };
    let (digits, scale) = normalized.abs().as_bigint_and_exponent();
    let digits = digits.to_string();

    if scale <= 0 {
        let zeros = "0".repeat(scale.unsigned_abs() as usize);
        return format!("{}{}{}", sign, digits, zeros);
    }

    let scale = scale as usize;
    let padded = if digits.len() <= scale {
        format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (whole, fraction) = padded.split_at(padded.len() - scale);
    format!("{}{}.{}", sign, whole, fraction)
}

/// Epoch milliseconds for a due date typed as `YYYY-MM-DD` (midnight UTC) or
/// as a full RFC 3339 timestamp. `None` when the text is empty or unparsable;
/// it is carried through to the payload as `null` rather than defaulted.
pub fn due_date_millis(text: &str) -> Option<i64> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc().timestamp_millis());
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|ts| ts.timestamp_millis())
}

// ── Contract message ─────────────────────────────────────────────────────────

/// Message sent to the invoice contract. Serialises as
/// `{"CreateInvoice": {...}}`; field names are fixed by the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecuteMsg {
    CreateInvoice(CreateInvoice),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInvoice {
    pub recipient: String,
    pub amount: String,
    pub description: String,
    pub due_date: Option<i64>,
}

/// What the chain write client reports for a successful execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResult {
    #[serde(default)]
    pub transaction_hash: String,
    #[serde(default)]
    pub height: u64,
    #[serde(default)]
    pub gas_used: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft_with_prices(prices: &[&str]) -> InvoiceDraft {
        let mut draft = InvoiceDraft::new();
        for (i, price) in prices.iter().enumerate() {
            if i > 0 {
                draft.add_item();
            }
            draft
                .set_item_field(i, ItemField::ItemPrice, *price)
                .expect("index in range");
        }
        draft
    }

    // ── items invariant ───────────────────────────────────────────────────────

    #[test]
    fn new_draft_has_one_blank_item() {
        let draft = InvoiceDraft::new();
        assert_eq!(draft.items(), &[LineItem::default()]);
        assert!(!draft.can_remove_items());
    }

    #[test]
    fn remove_last_item_is_a_no_op() {
        let mut draft = InvoiceDraft::new();
        draft
            .set_item_field(0, ItemField::ItemName, "design")
            .unwrap();

        assert!(!draft.remove_item(0).unwrap());
        assert_eq!(draft.items().len(), 1);
        assert_eq!(draft.items()[0].item_name, "design");
    }

    #[test]
    fn add_and_remove_sequences_never_empty_the_list() {
        let mut draft = InvoiceDraft::new();
        let ops = [true, false, false, true, true, false, false, false, true, false];
        for add in ops {
            if add {
                draft.add_item();
            } else {
                let _ = draft.remove_item(0).unwrap();
            }
            assert!(!draft.items().is_empty());
        }
    }

    #[test]
    fn remove_keeps_order_of_remaining_items() {
        let mut draft = InvoiceDraft::new();
        draft.add_item();
        draft.add_item();
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            draft.set_item_field(i, ItemField::ItemName, *name).unwrap();
        }

        assert!(draft.remove_item(1).unwrap());

        let names: Vec<&str> = draft.items().iter().map(|i| i.item_name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut draft = InvoiceDraft::new();
        assert!(matches!(
            draft.set_item_field(3, ItemField::ItemName, "x"),
            Err(DomainError::ItemNotFound(3))
        ));
        assert!(matches!(
            draft.remove_item(1),
            Err(DomainError::ItemNotFound(1))
        ));
    }

    #[test]
    fn set_field_replaces_scalar_fields() {
        let mut draft = InvoiceDraft::new();
        draft.set_field(DraftField::Payer, "abc1");
        draft.set_field(DraftField::Recipient, "xyz2");
        draft.set_field(DraftField::Description, "work");
        draft.set_field(DraftField::DueDate, "2025-01-01");
        draft.set_field(DraftField::Payer, "abc9");

        assert_eq!(draft.payer(), "abc9");
        assert_eq!(draft.recipient(), "xyz2");
        assert_eq!(draft.description(), "work");
        assert_eq!(draft.due_date(), "2025-01-01");
    }

    #[test]
    fn field_names_parse_from_form_names() {
        assert_eq!("dueDate".parse::<DraftField>().unwrap(), DraftField::DueDate);
        assert_eq!("itemPrice".parse::<ItemField>().unwrap(), ItemField::ItemPrice);
        assert!(matches!(
            "amount".parse::<DraftField>(),
            Err(DomainError::UnknownField(_))
        ));
    }

    // ── total ─────────────────────────────────────────────────────────────────

    #[test]
    fn total_sums_numeric_prices() {
        let draft = draft_with_prices(&["100", "250.5"]);
        assert_eq!(format_amount(&draft.total()), "350.5");
    }

    #[test]
    fn total_treats_empty_and_garbage_as_zero() {
        let draft = draft_with_prices(&["", "abc", "12.25", " 3 "]);
        assert_eq!(format_amount(&draft.total()), "15.25");
    }

    #[test]
    fn huge_exponent_price_counts_as_zero() {
        let started = std::time::Instant::now();
        let draft = draft_with_prices(&["1e200000000", "1"]);

        assert_eq!(format_amount(&draft.total()), "1");
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }

    #[test]
    fn exponent_within_range_is_accepted() {
        assert_eq!(format_amount(&parse_price("1e3")), "1000");
        assert_eq!(format_amount(&parse_price("2.5e-2")), "0.025");
        assert_eq!(parse_price("1e-65"), BigDecimal::zero());
    }

    #[test]
    fn total_of_blank_draft_is_zero() {
        assert_eq!(format_amount(&InvoiceDraft::new().total()), "0");
    }

    #[test]
    fn format_amount_drops_trailing_zeros_without_exponent() {
        assert_eq!(format_amount(&BigDecimal::from_str("2.50").unwrap()), "2.5");
        assert_eq!(format_amount(&BigDecimal::from_str("1200").unwrap()), "1200");
        assert_eq!(format_amount(&BigDecimal::from_str("-4.0").unwrap()), "-4");
    }

    #[test]
    fn format_amount_renders_small_values_without_exponent() {
        assert_eq!(format_amount(&BigDecimal::from_str("0.0000001").unwrap()), "0.0000001");
        assert_eq!(
            format_amount(&BigDecimal::from_str("1e-20").unwrap()),
            "0.00000000000000000001"
        );
        assert_eq!(format_amount(&BigDecimal::from_str("-0.05").unwrap()), "-0.05");
        assert_eq!(format_amount(&BigDecimal::from_str("12.340").unwrap()), "12.34");
    }

    // ── address validation ────────────────────────────────────────────────────

    #[test]
    fn address_check_accepts_lowercase_alphanumerics_only() {
        assert!(is_valid_address("abc123"));
        assert!(is_valid_address("xion1qqq"));
        assert!(!is_valid_address("ABC123"));
        assert!(!is_valid_address("abc 123"));
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("Invalid!"));
        assert!(!is_valid_address("abc\n"));
    }

    // ── due date ──────────────────────────────────────────────────────────────

    #[test]
    fn date_input_parses_to_utc_midnight_millis() {
        assert_eq!(due_date_millis("2025-01-01"), Some(1_735_689_600_000));
    }

    #[test]
    fn rfc3339_timestamp_is_accepted() {
        assert_eq!(
            due_date_millis("2025-01-01T01:00:00+01:00"),
            Some(1_735_689_600_000)
        );
    }

    #[test]
    fn empty_or_garbage_due_date_is_none() {
        assert_eq!(due_date_millis(""), None);
        assert_eq!(due_date_millis("next tuesday"), None);
        assert_eq!(due_date_millis("2025-02-30"), None);
    }

    // ── execute message ───────────────────────────────────────────────────────

    #[test]
    fn execute_msg_has_contract_shape() {
        let mut draft = draft_with_prices(&["100", "250.5"]);
        draft.set_field(DraftField::Payer, "abc1");
        draft.set_field(DraftField::Recipient, "xyz2");
        draft.set_field(DraftField::Description, "work");
        draft.set_field(DraftField::DueDate, "2025-01-01");

        let msg = draft.to_execute_msg().expect("valid draft");

        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "CreateInvoice": {
                    "recipient": "xyz2",
                    "amount": "350.5",
                    "description": "work",
                    "due_date": 1_735_689_600_000i64
                }
            })
        );
    }

    #[test]
    fn unparsable_due_date_is_sent_as_null() {
        let mut draft = InvoiceDraft::new();
        draft.set_field(DraftField::Payer, "abc1");
        draft.set_field(DraftField::Recipient, "xyz2");

        let value = serde_json::to_value(draft.to_execute_msg().unwrap()).unwrap();

        assert!(value["CreateInvoice"]["due_date"].is_null());
        assert_eq!(value["CreateInvoice"]["amount"], "0");
    }

    #[test]
    fn invalid_payer_or_recipient_is_rejected() {
        let mut draft = InvoiceDraft::new();
        draft.set_field(DraftField::Payer, "abc1");
        draft.set_field(DraftField::Recipient, "Invalid!");
        assert!(matches!(
            draft.to_execute_msg(),
            Err(DomainError::InvalidAddressFormat)
        ));

        draft.set_field(DraftField::Recipient, "xyz2");
        draft.set_field(DraftField::Payer, "");
        assert!(matches!(
            draft.to_execute_msg(),
            Err(DomainError::InvalidAddressFormat)
        ));
    }

    #[test]
    fn execute_result_decodes_with_missing_counters() {
        let result: ExecuteResult =
            serde_json::from_value(json!({ "transactionHash": "ABCD" })).unwrap();
        assert_eq!(result.transaction_hash, "ABCD");
        assert_eq!(result.height, 0);
    }

    #[test]
    fn empty_execute_result_decodes() {
        let result: ExecuteResult = serde_json::from_value(json!({})).unwrap();
        assert!(result.transaction_hash.is_empty());
        assert_eq!(result.gas_used, 0);
    }
}
