use rust_decimal::Decimal;
use serde::Deserialize;

use goldbook_advisor::BalanceSnapshot;
use goldbook_banking::BankAccount;
use goldbook_infra::{BatchItem, BatchReport, CommitReceipt, CustomerOverview, ItemOutcome};
use goldbook_inventory::{JewelryItem, StandardItem};
use goldbook_ledger::{Balance, PostedTransaction};
use goldbook_parties::Customer;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterCustomerRequest {
    pub full_name: String,
    /// `"customer"` or `"collaborator"`.
    pub role: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameCustomerRequest {
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ListCustomersQuery {
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    /// RFC 3339 cutoff; omitted means the full history.
    pub as_of: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OpenBankAccountRequest {
    pub label: String,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
pub struct RelabelBankAccountRequest {
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct CatalogStandardItemRequest {
    pub code: String,
    pub name: String,
    pub unit_weight_grams: Decimal,
    pub purity: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct IntakeJewelryRequest {
    pub code: String,
    pub name: String,
    pub weight_grams: Decimal,
    pub purity: Decimal,
    #[serde(default)]
    pub premium: Decimal,
    /// `"in_stock"` (default) or `"disposed"`, for pieces cataloged while
    /// they are physically with a customer.
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListJewelryQuery {
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub requests: Vec<goldbook_infra::TransactionRequest>,
}

#[derive(Debug, Deserialize)]
pub struct SettlementRequest {
    /// Overrides the configured gram quote for this one answer.
    #[serde(default)]
    pub gold_price: Option<Decimal>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn customer_to_json(customer: &Customer) -> serde_json::Value {
    serde_json::json!({
        "id": customer.id().to_string(),
        "full_name": customer.full_name(),
        "role": customer.role().as_str(),
        "phone": customer.phone(),
        "registered_at": customer.registered_at().to_rfc3339(),
    })
}

pub fn bank_account_to_json(account: &BankAccount) -> serde_json::Value {
    serde_json::json!({
        "id": account.id().to_string(),
        "label": account.label(),
        "currency": account.currency(),
        "opened_at": account.opened_at().to_rfc3339(),
    })
}

pub fn standard_item_to_json(item: &StandardItem) -> serde_json::Value {
    serde_json::json!({
        "id": item.id().to_string(),
        "code": item.code(),
        "name": item.name(),
        "unit_weight_grams": item.unit_weight_grams().to_string(),
        "purity": item.purity().to_string(),
        "unit_pure_grams": item.unit_pure_grams().to_string(),
        "cataloged_at": item.cataloged_at().to_rfc3339(),
    })
}

pub fn jewelry_to_json(piece: &JewelryItem) -> serde_json::Value {
    serde_json::json!({
        "id": piece.id().to_string(),
        "code": piece.code(),
        "name": piece.name(),
        "weight_grams": piece.weight_grams().to_string(),
        "purity": piece.purity().to_string(),
        "premium": piece.premium().to_string(),
        "pure_grams": piece.pure_grams().to_string(),
        "state": piece.state().as_str(),
        "cataloged_at": piece.cataloged_at().to_rfc3339(),
    })
}

pub fn balance_to_json(balance: &Balance) -> serde_json::Value {
    serde_json::json!({
        "money": balance.money.to_string(),
        "gold_grams": balance.gold_grams.to_string(),
        "settled": balance.is_settled(),
    })
}

pub fn posted_to_json(posted: &PostedTransaction) -> serde_json::Value {
    serde_json::json!({
        "sequence": posted.sequence,
        "id": posted.record.id.to_string(),
        "customer_id": posted.record.customer_id.to_string(),
        "transaction_type": posted.record.kind().wire_name(),
        "details": &posted.record.details,
        "note": &posted.record.note,
        "recorded_at": posted.record.recorded_at.to_rfc3339(),
    })
}

pub fn receipt_to_json(receipt: &CommitReceipt) -> serde_json::Value {
    serde_json::json!({
        "transaction_id": receipt.transaction_id.to_string(),
        "sequence": receipt.sequence,
        "recorded_at": receipt.recorded_at.to_rfc3339(),
    })
}

pub fn batch_item_to_json(item: &BatchItem) -> serde_json::Value {
    match &item.outcome {
        ItemOutcome::Committed(receipt) => serde_json::json!({
            "index": item.index,
            "status": "committed",
            "receipt": receipt_to_json(receipt),
        }),
        ItemOutcome::Rejected(reason) => serde_json::json!({
            "index": item.index,
            "status": "rejected",
            "error": reason.kind(),
            "message": reason.to_string(),
        }),
    }
}

pub fn batch_report_to_json(report: &BatchReport) -> serde_json::Value {
    serde_json::json!({
        "items": report.items.iter().map(batch_item_to_json).collect::<Vec<_>>(),
        "committed": report.committed_count(),
        "rejected": report.rejected_count(),
    })
}

/// Flatten a reader overview into the advisor's input row.
pub fn overview_to_snapshot(overview: &CustomerOverview) -> BalanceSnapshot {
    BalanceSnapshot {
        customer_id: overview.customer.id(),
        full_name: overview.customer.full_name().to_string(),
        collaborator: overview.customer.is_collaborator(),
        money: overview.balance.money,
        gold_grams: overview.balance.gold_grams,
    }
}
