mod support;

use levelup_client::commands::categories::{self, CategoryListOptions};
use serde_json::json;
use support::ledger_testkit::{add_category, category_id, seed, temp_home};

#[test]
fn add_returns_the_new_category() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let added = add_category(&home, "  Eating Out ");
        assert!(added.is_ok());
        if let Ok(envelope) = added {
            assert_eq!(envelope.command, "categories add");
            assert_eq!(envelope.data["category"]["name"], "Eating Out");
            assert_eq!(envelope.data["category"]["transaction_count"], 0);
            assert!(
                envelope.data["category"]["category_id"]
                    .as_str()
                    .is_some_and(|id| id.starts_with("cat_"))
            );
        }
    }
}

#[test]
fn duplicate_name_is_rejected_case_insensitively() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        assert!(add_category(&home, "Groceries").is_ok());
        let existing = category_id(&home, "Groceries");

        let again = add_category(&home, "GROCERIES");
        assert!(again.is_err());
        if let Err(error) = again {
            assert_eq!(error.code, "category_exists");
            assert!(!error.is_service_fault());
            assert_eq!(
                error.data.as_ref().map(|data| data["category_id"].clone()),
                Some(json!(existing))
            );
        }
    }
}

#[test]
fn blank_name_is_an_invalid_argument() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let added = add_category(&home, "   ");
        assert!(added.is_err());
        if let Err(error) = added {
            assert_eq!(error.code, "invalid_argument");
            assert_eq!(
                error.recovery_steps,
                vec!["Run `levelup categories add --help` for usage."]
            );
        }
    }
}

#[test]
fn list_counts_transactions_per_category() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        assert!(add_category(&home, "Utilities").is_ok());
        seed(
            &home,
            &[
                json!({"date": "2024-01-10", "description": "Trader Joes", "amount": -42.5, "category": "Groceries"}),
                json!({"date": "2024-01-17", "description": "Trader Joes", "amount": -12, "category": "Groceries"}),
            ],
        );

        let listed = categories::list_with_options(CategoryListOptions {
            home_override: Some(&home),
        });
        assert!(listed.is_ok());
        if let Ok(envelope) = listed {
            assert_eq!(envelope.command, "categories list");
            assert_eq!(envelope.data["rows"][0]["name"], "Groceries");
            assert_eq!(envelope.data["rows"][0]["transaction_count"], 2);
            assert_eq!(envelope.data["rows"][1]["name"], "Utilities");
            assert_eq!(envelope.data["rows"][1]["transaction_count"], 0);
        }
    }
}
