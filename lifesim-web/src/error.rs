use lifesim_game::{DecisionError, PurchaseError, StorageError};
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures reported back to the UI as thrown strings.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no life in progress")]
    NoSession,
    #[error("unknown {kind} `{value}`")]
    Unknown { kind: &'static str, value: String },
    #[error(transparent)]
    Decision(#[from] DecisionError),
    #[error(transparent)]
    Purchase(#[from] PurchaseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<BridgeError> for JsValue {
    fn from(err: BridgeError) -> Self {
        Self::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_pass_through_engine_errors() {
        assert_eq!(
            BridgeError::from(DecisionError::Incarcerated).to_string(),
            "not available while incarcerated"
        );
        assert_eq!(
            BridgeError::Unknown {
                kind: "minigame",
                value: "pinball".into()
            }
            .to_string(),
            "unknown minigame `pinball`"
        );
        assert_eq!(BridgeError::NoSession.to_string(), "no life in progress");
    }
}
