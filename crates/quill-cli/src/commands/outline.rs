use super::AppContext;
use anyhow::Result;
use quill_core::structure::OutlineBuilder;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let document = ctx.document().await?;
    let outline = OutlineBuilder::new()
        .with_max_preview_chars(ctx.config.outline.max_preview_chars)
        .build(document.raw_text());

    if outline.is_empty() {
        println!("No sections found.");
        return Ok(());
    }

    for (i, section) in outline.iter().enumerate() {
        println!(
            "- [{}] {} (lines {}..{})",
            i + 1,
            section.title,
            section.start_line,
            section.end_line
        );
    }
    Ok(())
}
