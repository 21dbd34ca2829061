use super::AppContext;
use anyhow::{Result, bail};
use quill_application::{ChangeNotifier, DocumentPatchService};
use quill_core::QuillError;
use quill_core::patch::{PatchApplier, PatchRequest};
use serde_json::{Value, json};
use std::sync::Arc;

pub async fn run(ctx: &AppContext, old: String, new: String) -> Result<()> {
    let service = DocumentPatchService::new(ctx.repository.clone(), Arc::new(ChangeNotifier::new()));

    match service.apply_patch(&PatchRequest::new(old, new)).await {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&json!({ "success": true, "outcome": outcome }))?);
            Ok(())
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&failure_body(&err))?);
            bail!(err)
        }
    }
}

/// Failure payload with location diagnostics when the text was not found.
fn failure_body(err: &QuillError) -> Value {
    match err {
        QuillError::PatchNotFound {
            searched_length,
            first_chars,
        }
        | QuillError::AnchorDegraded {
            searched_length,
            first_chars,
        } => json!({
            "error": err.to_string(),
            "searchedLength": searched_length,
            "firstChars": first_chars,
        }),
        other => json!({ "error": other.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_body_carries_diagnostics() {
        let body = failure_body(&QuillError::patch_not_found("missing text"));
        assert_eq!(body["searchedLength"], 12);
        assert_eq!(body["firstChars"], "missing text");
    }

    #[test]
    fn other_failures_only_carry_the_message() {
        let body = failure_body(&QuillError::unsafe_edit("unbalanced"));
        assert_eq!(body, json!({ "error": "Unsafe edit: unbalanced" }));
    }
}
