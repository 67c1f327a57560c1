use serde::Serialize;
use serde_json::Value;

use crate::API_VERSION;
use crate::error::{ClientError, ClientResult};

/// Result of a successful command. `command` routes text rendering in the CLI
/// and is left out of the JSON body.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope {
    pub ok: bool,
    #[serde(skip_serializing)]
    pub command: String,
    pub version: String,
    pub data: Value,
}

/// `{"error": {...}}`, the one failure shape every command shares.
#[derive(Debug, Clone, Serialize)]
pub struct FailureEnvelope {
    pub error: ErrorContract,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorContract {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

pub fn success<T>(command: &str, data: T) -> ClientResult<SuccessEnvelope>
where
    T: Serialize,
{
    let data = serde_json::to_value(data)
        .map_err(|err| ClientError::internal_serialization(&err.to_string()))?;
    Ok(SuccessEnvelope {
        ok: true,
        command: command.to_string(),
        version: API_VERSION.to_string(),
        data,
    })
}

pub fn failure_from_error(error: &ClientError) -> FailureEnvelope {
    FailureEnvelope {
        error: ErrorContract {
            code: error.code.clone(),
            message: error.message.clone(),
            recovery_steps: error.recovery_steps.clone(),
            data: error.data.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{failure_from_error, success};
    use crate::ClientError;

    #[test]
    fn success_wraps_serialized_data() {
        let envelope = success("categories list", json!({"rows": []}));
        assert!(envelope.is_ok());
        if let Ok(value) = envelope {
            assert!(value.ok);
            assert_eq!(value.command, "categories list");
            assert_eq!(value.data["rows"], json!([]));
        }
    }

    #[test]
    fn success_json_omits_command_name() {
        let envelope = success("check", json!({}));
        assert!(envelope.is_ok());
        if let Ok(value) = envelope {
            let body = serde_json::to_value(&value);
            assert!(body.is_ok());
            if let Ok(body) = body {
                assert!(body.get("command").is_none());
                assert_eq!(body["version"], "v1");
            }
        }
    }

    #[test]
    fn failure_nests_data_under_error() {
        let error = ClientError::category_exists("Groceries", "cat_1");
        let body = serde_json::to_value(failure_from_error(&error));
        assert!(body.is_ok());
        if let Ok(body) = body {
            assert_eq!(body["error"]["code"], "category_exists");
            assert_eq!(body["error"]["data"]["category_id"], "cat_1");
            assert!(body.get("ok").is_none());
        }
    }
}
