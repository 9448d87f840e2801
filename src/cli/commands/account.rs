//! `bc4 account` — list accounts, pick the default.

use anyhow::Result;

use crate::api::Account;
use crate::cli::Context;

pub async fn list(ctx: &Context) -> Result<()> {
    let api = ctx.ensure_auth().await?;
    let authorization = api.get_identity().await?;
    let accounts: Vec<&Account> = authorization
        .accounts
        .iter()
        .filter(|a| a.is_basecamp())
        .collect();

    if accounts.is_empty() {
        println!("No Basecamp accounts found.");
        return Ok(());
    }

    println!("\nAccounts ({}):", accounts.len());
    for account in accounts {
        let default = if ctx.settings.default_account_id.as_deref()
            == Some(account.id.to_string().as_str())
        {
            " (default)"
        } else {
            ""
        };
        println!("  {} (ID: {}){}", account.name, account.id, default);
        if let Some(href) = &account.href {
            println!("    URL: {href}");
        }
    }
    Ok(())
}

pub async fn select(ctx: &mut Context) -> Result<()> {
    let api = ctx.ensure_auth().await?;
    let Some(account_id) = ctx.select_account(&api).await? else {
        return Ok(());
    };

    let authorization = api.get_identity().await?;
    let name = authorization
        .accounts
        .iter()
        .find(|a| a.id.to_string() == account_id)
        .map(|a| a.name.clone())
        .unwrap_or_else(|| account_id.clone());

    ctx.settings.default_account_id = Some(account_id);
    ctx.settings.save()?;
    println!("✓ Set default account: {name}");
    Ok(())
}
