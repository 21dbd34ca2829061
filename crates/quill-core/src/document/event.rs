use serde::{Deserialize, Serialize};

/// Events published to document subscribers.
///
/// Consumers re-fetch the whole document on receipt; no delta is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DocumentEvent {
    /// The document was rewritten.
    ManualUpdated { ok: bool },
}

impl DocumentEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ManualUpdated { .. } => "manual_updated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_event_name() {
        let json = serde_json::to_value(DocumentEvent::ManualUpdated { ok: true }).unwrap();
        assert_eq!(json, serde_json::json!({ "event": "manual_updated", "ok": true }));
        assert_eq!(DocumentEvent::ManualUpdated { ok: true }.name(), "manual_updated");
    }
}
