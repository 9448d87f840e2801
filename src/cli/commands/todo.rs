//! `bc4 todo` — create todos interactively, list todo lists.

use anyhow::Result;

use crate::cli::Context;

/// Pick (or create) a todo list, then add todos until an empty line.
///
/// Individual creation failures are reported and skipped; the loop keeps
/// going.
pub async fn create(ctx: &mut Context, account: Option<String>, project: Option<String>) -> Result<()> {
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

    let todoset_id = api.get_todoset_id(&account_id, &project_id).await?;
    let todolists = api
        .get_todolists(&account_id, &project_id, todoset_id)
        .await?;

    let mut options: Vec<String> = todolists.iter().map(|tl| tl.name.clone()).collect();
    options.push("Create new list".to_string());
    let choice = ctx
        .prompter()
        .choose_one("Select a todo list or create a new one", &options)?;

    let todolist_id = if choice < todolists.len() {
        todolists[choice].id
    } else {
        let name = ctx.prompter().read_line("List name")?;
        let description = ctx.prompter().read_line("Description (optional)")?;
        let new_list = api
            .create_todolist(&account_id, &project_id, todoset_id, &name, &description)
            .await?;
        println!("✓ Created list: {name}");
        new_list.id
    };

    println!("\nAdd todos (empty line to finish):");
    let mut count = 0;
    loop {
        let content = ctx.prompter().read_line(&format!("Todo {}", count + 1))?;
        if content.is_empty() {
            break;
        }
        let description = ctx.prompter().read_line("  Description (optional)")?;

        match api
            .create_todo(&account_id, &project_id, todolist_id, &content, &description)
            .await
        {
            Ok(_) => {
                println!("  ✓ Added: {content}");
                count += 1;
            }
            Err(e) => println!("  ✗ Failed: {e}"),
        }
    }

    if count > 0 {
        println!("\n✓ Added {count} todo(s)");
    }
    Ok(())
}

/// Print every todo list in the project with its first todos.
pub async fn list(
    ctx: &mut Context,
    project_name: Option<String>,
    account: Option<String>,
    project: Option<String>,
) -> Result<()> {
    let api = ctx.ensure_auth().await?;
    let Some(account_id) = ctx.resolve_account(&api, account.as_deref()).await? else {
        return Ok(());
    };

    let project_id = match project.or_else(|| ctx.settings.default_project_id.clone()) {
        Some(id) => id,
        None => match project_name {
            Some(name) => match ctx.match_project_by_name(&api, &account_id, &name).await? {
                Some(p) => p.id.to_string(),
                None => return Ok(()),
            },
            None => match ctx.select_project(&api, &account_id).await? {
                Some(id) => id,
                None => return Ok(()),
            },
        },
    };

    let project = api.get_project(&account_id, &project_id).await?;
    println!("\nTodo lists in '{}':", project.name);

    let todoset_id = api.get_todoset_id(&account_id, &project_id).await?;
    let todolists = api
        .get_todolists(&account_id, &project_id, todoset_id)
        .await?;
    if todolists.is_empty() {
        println!("  No todo lists found");
        return Ok(());
    }

    for todolist in &todolists {
        println!("\n  {}:", todolist.name);
        let todos = api
            .get_todos(&account_id, &project_id, todolist.id)
            .await?;
        if todos.is_empty() {
            println!("    (empty)");
            continue;
        }
        for todo in todos.iter().take(10) {
            let marker = if todo.completed { "✓" } else { "□" };
            println!("    {} {}", marker, todo.content);
        }
        if todos.len() > 10 {
            println!("    ... and {} more", todos.len() - 10);
        }
    }
    Ok(())
}
