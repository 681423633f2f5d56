// Runtime messaging: every message is acknowledged with a fixed status.
// No settings travel over this channel yet.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const STATUS_OK: &str = "ok";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MessageResponse {
    pub status: String,
}

impl MessageResponse {
    pub fn ok() -> Self {
        Self {
            status: STATUS_OK.to_owned(),
        }
    }
}

pub fn acknowledge(message: &Value) -> MessageResponse {
    log::info!("Message received: {}", message);
    MessageResponse::ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn any_payload_gets_ok() {
        for message in [json!(null), json!("ping"), json!({ "type": "hello", "n": 1 })] {
            assert_eq!(acknowledge(&message), MessageResponse::ok());
        }
    }

    #[test]
    fn response_shape() {
        let json = serde_json::to_value(MessageResponse::ok()).unwrap();
        assert_eq!(json, json!({ "status": "ok" }));
    }
}
