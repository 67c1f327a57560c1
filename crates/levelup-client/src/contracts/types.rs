use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DataRange {
    pub earliest: Option<String>,
    pub latest: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerContext {
    pub db_path: String,
    pub schema_version: String,
    pub data_range: DataRange,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub rows_read: i64,
    pub rows_valid: i64,
    pub rows_invalid: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchIssue {
    pub row: i64,
    pub field: String,
    pub code: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckWindow {
    pub from: String,
    pub to: String,
    pub existing_records: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    pub rows_checked: i64,
    pub duplicates: i64,
    pub suggested: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckedRow {
    pub row: i64,
    pub date: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub is_duplicate: bool,
    pub existing_transaction_id: Option<String>,
    pub existing_category_id: Option<String>,
    pub suggested_category_id: Option<String>,
    pub suggested_category_name: Option<String>,
    pub suggestion_source: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckData {
    pub account_id: Option<String>,
    pub source: String,
    pub path: Option<String>,
    pub window: CheckWindow,
    pub summary: CheckSummary,
    pub rows: Vec<CheckedRow>,
    pub ledger: LedgerContext,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryItem {
    pub category_id: String,
    pub name: String,
    pub created_at: String,
    pub transaction_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryAddData {
    pub message: String,
    pub category: CategoryItem,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryListData {
    pub rows: Vec<CategoryItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionItem {
    pub txn_id: String,
    pub account_id: Option<String>,
    pub posted_at: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionListData {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: i64,
    pub rows: Vec<TransactionItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub rows_read: i64,
    pub inserted: i64,
    pub skipped_duplicates: i64,
    pub categories_created: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedRow {
    pub row: i64,
    pub date: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub existing_transaction_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionImportData {
    pub account_id: Option<String>,
    pub source: String,
    pub path: Option<String>,
    pub message: String,
    pub summary: ImportSummary,
    pub skipped: Vec<SkippedRow>,
    pub ledger: LedgerContext,
}
