use minijinja::{Environment, context};
use quill_core::{QuillError, Result};
use quill_interaction::prompts::{SYSTEM_TEMPLATE, TOOLS_PROMPT};

/// Renders the system message with the tool description substituted.
pub fn render_system_prompt() -> Result<String> {
    render_with(SYSTEM_TEMPLATE, TOOLS_PROMPT)
}

fn render_with(template: &str, tools: &str) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("system", template)
        .map_err(|e| QuillError::internal(format!("Invalid system template: {e}")))?;
    env.get_template("system")
        .and_then(|t| t.render(context! { TOOLS => tools }))
        .map_err(|e| QuillError::internal(format!("Failed to render system prompt: {e}")))
}
