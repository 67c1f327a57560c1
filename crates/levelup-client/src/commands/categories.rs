use std::path::Path;

use rusqlite::TransactionBehavior;

use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{CategoryAddData, CategoryItem, CategoryListData};
use crate::ledger::categories;
use crate::setup::load_setup;
use crate::state::{map_sqlite_error, open_connection, open_readonly_connection};
use crate::{ClientError, ClientResult};

const ADD_COMMAND: &str = "categories add";
const LIST_COMMAND: &str = "categories list";

#[derive(Debug, Default)]
pub struct CategoryAddOptions<'a> {
    pub name: String,
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct CategoryListOptions<'a> {
    pub home_override: Option<&'a Path>,
}

pub fn add(name: &str) -> ClientResult<SuccessEnvelope> {
    add_with_options(CategoryAddOptions {
        name: name.to_string(),
        home_override: None,
    })
}

#[doc(hidden)]
pub fn add_with_options(options: CategoryAddOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let name = options.name.trim();
    if name.is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "Category name must not be empty.",
            Some(ADD_COMMAND),
        ));
    }

    let setup = load_setup(options.home_override)?;
    let mut connection = open_connection(&setup.db_path)?;
    let transaction = connection
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|error| map_sqlite_error(&setup.db_path, &error))?;

    if let Some(existing) = categories::find_by_name(&transaction, &setup.db_path, name)? {
        return Err(ClientError::category_exists(
            &existing.name,
            &existing.category_id,
        ));
    }
    let created = categories::insert_category(&transaction, &setup.db_path, name)?;

    transaction
        .commit()
        .map_err(|error| map_sqlite_error(&setup.db_path, &error))?;

    let data = CategoryAddData {
        message: format!("Added category `{}`.", created.name),
        category: CategoryItem {
            category_id: created.category_id,
            name: created.name,
            created_at: created.created_at,
            transaction_count: 0,
        },
    };
    success(ADD_COMMAND, data)
}

pub fn list() -> ClientResult<SuccessEnvelope> {
    list_with_options(CategoryListOptions {
        home_override: None,
    })
}

#[doc(hidden)]
pub fn list_with_options(options: CategoryListOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let connection = open_readonly_connection(&setup.db_path)?;
    let rows = categories::list_with_counts(&connection, &setup.db_path)?;
    success(LIST_COMMAND, CategoryListData { rows })
}
