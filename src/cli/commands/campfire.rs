//! `bc4 campfire` — post chat lines and formatted updates.

use anyhow::{bail, Result};

use crate::api::{ApiClient, ApiError};
use crate::cli::Context;

pub async fn post(
    ctx: &mut Context,
    project_name: Option<String>,
    message: Vec<String>,
    account: Option<String>,
    project: Option<String>,
) -> Result<()> {
    let api = ctx.ensure_auth().await?;
    let Some(account_id) = ctx.resolve_account(&api, account.as_deref()).await? else {
        return Ok(());
    };

    let flagged = project.or_else(|| ctx.settings.default_project_id.clone());
    let (project_id, display_name) = match flagged {
        Some(id) => {
            let project = api.get_project(&account_id, &id).await?;
            (id, project.name)
        }
        None => match project_name {
            Some(name) => {
                match ctx.match_project_by_name(&api, &account_id, &name).await? {
                    Some(p) => (p.id.to_string(), p.name),
                    None => return Ok(()),
                }
            }
            None => match ctx.select_project(&api, &account_id).await? {
                Some(id) => {
                    let project = api.get_project(&account_id, &id).await?;
                    (id, project.name)
                }
                None => return Ok(()),
            },
        },
    };

    let content = if message.is_empty() {
        println!("Post to Campfire in '{display_name}'");
        let line = ctx.prompter().read_line("Message")?;
        if line.is_empty() {
            println!("Message is required");
            return Ok(());
        }
        line
    } else {
        message.join(" ")
    };

    post_line(&api, &account_id, &project_id, &content).await?;
    println!("✓ Posted to Campfire in '{display_name}': {content}");
    Ok(())
}

/// Post a formatted update: the user picks a type, the message gets a
/// matching prefix, and extra context lines are optional.
pub async fn update(ctx: &Context, account: Option<String>, project: Option<String>) -> Result<()> {
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

    let project = api.get_project(&account_id, &project_id).await?;
    println!("\nPost update to Campfire in '{}'", project.name);

    let options = [
        "Progress update",
        "Completed task",
        "Blocker/Issue",
        "Question",
        "Custom",
    ]
    .map(String::from);
    let choice = ctx.prompter().choose_one("Update type", &options)?;

    let mut content = match choice {
        0 => format!(
            "📊 Progress Update: {}",
            ctx.prompter().read_line("What's the update?")?
        ),
        1 => format!(
            "✅ Completed: {}",
            ctx.prompter().read_line("What was completed?")?
        ),
        2 => format!(
            "🚨 Blocker: {}",
            ctx.prompter().read_line("What's blocking progress?")?
        ),
        3 => format!(
            "❓ Question: {}",
            ctx.prompter().read_line("What's your question?")?
        ),
        _ => ctx.prompter().read_line("Enter your message")?,
    };

    if content.trim().is_empty() {
        println!("Message is required");
        return Ok(());
    }

    let add_context = ctx.prompter().read_line("\nAdd more context? (y/N)")?;
    if add_context.eq_ignore_ascii_case("y") {
        println!("Additional context (blank line to finish):");
        let mut lines = vec![content.clone(), String::new()];
        loop {
            let line = ctx.prompter().read_line("")?;
            if line.is_empty() {
                break;
            }
            lines.push(line);
        }
        content = lines.join("\n");
    }

    post_line(&api, &account_id, &project_id, &content).await?;
    println!("\n✓ Posted update to Campfire");
    Ok(())
}

/// Posting gets a specific message when the project has no Campfire.
async fn post_line(
    api: &ApiClient,
    account_id: &str,
    project_id: &str,
    content: &str,
) -> Result<()> {
    match api.post_campfire_line(account_id, project_id, content).await {
        Ok(_) => Ok(()),
        Err(ApiError::ToolNotEnabled { .. }) => {
            bail!("This project doesn't have a Campfire chat enabled")
        }
        Err(e) => Err(e.into()),
    }
}
