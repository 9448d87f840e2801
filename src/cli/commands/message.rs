//! `bc4 message` — post to the project message board.

use anyhow::Result;

use crate::cli::Context;

pub async fn post(ctx: &Context, account: Option<String>, project: Option<String>) -> Result<()> {
    let api = ctx.ensure_auth().await?;
    let Some(account_id) = ctx.resolve_account(&api, account.as_deref()).await? else {
        return Ok(());
    };
    let Some(project_id) = ctx
        .resolve_project(&api, &account_id, project.as_deref())
        .await?
    else {
        return Ok(());
    };

    let title = ctx.prompter().read_line("Message title")?;
    if title.is_empty() {
        println!("Title is required");
        return Ok(());
    }

    println!("Message content (enter blank line to finish):");
    let mut lines = Vec::new();
    loop {
        let line = ctx.prompter().read_line("")?;
        if line.is_empty() {
            break;
        }
        lines.push(line);
    }
    let content = lines.join("\n");
    if content.is_empty() {
        println!("Content is required");
        return Ok(());
    }

    api.post_message(&account_id, &project_id, &title, &content)
        .await?;
    println!("✓ Posted message: {title}");
    Ok(())
}
