//! `bc4 project` — list, select, find by name fragment.

use anyhow::Result;

use crate::cli::Context;

pub async fn list(ctx: &Context, account: Option<String>) -> Result<()> {
    let api = ctx.ensure_auth().await?;
    let Some(account_id) = ctx.resolve_account(&api, account.as_deref()).await? else {
        return Ok(());
    };

    let projects = api.get_projects(&account_id, true).await?;
    if projects.is_empty() {
        println!("No projects found.");
        return Ok(());
    }

    println!("\nProjects ({}):", projects.len());
    for project in &projects {
        match project.created_at {
            Some(created) => println!(
                "  {} (ID: {}, created: {})",
                project.name,
                project.id,
                created.format("%Y-%m-%d")
            ),
            None => println!("  {} (ID: {})", project.name, project.id),
        }
        if let Some(desc) = project.description.as_deref().filter(|d| !d.is_empty()) {
            println!("    {desc}");
        }
    }
    Ok(())
}

pub async fn select(ctx: &mut Context, account: Option<String>) -> Result<()> {
    let api = ctx.ensure_auth().await?;
    let Some(account_id) = ctx.resolve_account(&api, account.as_deref()).await? else {
        return Ok(());
    };
    let Some(project_id) = ctx.select_project(&api, &account_id).await? else {
        return Ok(());
    };

    ctx.settings.default_project_id = Some(project_id);
    ctx.settings.default_account_id = Some(account_id);
    ctx.settings.save()?;
    println!("✓ Set as default project");
    Ok(())
}

/// Find a project by name fragment, show its details and enabled tools, and
/// save it as the default.
pub async fn find(ctx: &mut Context, pattern: &str) -> Result<()> {
    let api = ctx.ensure_auth().await?;
    let Some(account_id) = ctx.resolve_account(&api, None).await? else {
        return Ok(());
    };

    let projects = api.get_projects(&account_id, true).await?;
    let needle = pattern.to_lowercase();
    let matches: Vec<_> = projects
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect();

    if matches.is_empty() {
        println!("No project found matching '{pattern}'");
        return Ok(());
    }
    if matches.len() > 1 {
        println!("Multiple projects match '{pattern}':");
        for p in matches.iter().take(5) {
            println!("  - {}", p.name);
        }
        if matches.len() > 5 {
            println!("  ... and {} more", matches.len() - 5);
        }
        println!("\nPlease be more specific.");
        return Ok(());
    }

    let project = matches[0];
    println!("\nProject: {}", project.name);
    println!("ID: {}", project.id);
    if let Some(created) = project.created_at {
        println!("Created: {}", created.format("%Y-%m-%d"));
    }
    if let Some(desc) = project.description.as_deref().filter(|d| !d.is_empty()) {
        println!("Description: {desc}");
    }

    // The listing omits the dock; fetch the full project for tool info
    let full = api
        .get_project(&account_id, &project.id.to_string())
        .await?;
    let tools: Vec<&str> = full
        .dock
        .iter()
        .filter(|entry| entry.enabled)
        .map(|entry| entry.title.as_deref().unwrap_or(&entry.name))
        .collect();
    if !tools.is_empty() {
        println!("Tools: {}", tools.join(", "));
    }

    ctx.settings.default_project_id = Some(project.id.to_string());
    ctx.settings.default_account_id = Some(account_id);
    ctx.settings.save()?;
    println!("\n✓ Set as default project");
    Ok(())
}
