use super::AppContext;
use anyhow::{Result, bail};
use quill_core::anchor::TextAnchorResolver;
use quill_core::structure::SectionContextExtractor;

pub async fn resolve(ctx: &AppContext, selection: &str) -> Result<()> {
    let selection = selection.trim();
    if selection.is_empty() {
        bail!("Selection is empty");
    }
    let document = ctx.document().await?;
    let resolution = TextAnchorResolver::new().resolve(selection, document.raw_text());
    println!("{}", serde_json::to_string_pretty(&resolution)?);
    Ok(())
}

pub async fn context(ctx: &AppContext, selection: &str) -> Result<()> {
    let selection = selection.trim();
    if selection.is_empty() {
        bail!("Selection is empty");
    }
    let document = ctx.document().await?;
    let anchor = TextAnchorResolver::new().resolve(selection, document.raw_text());
    let context = SectionContextExtractor::new().extract(document.raw_text(), &anchor.text);
    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}
