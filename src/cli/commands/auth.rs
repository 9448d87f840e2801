//! `bc4 auth` — login, status, logout.

use anyhow::Result;

use crate::api::{Account, ApiClient};
use crate::cli::Context;

/// Log in and remember the default account when the choice is obvious.
pub async fn login(ctx: &mut Context) -> Result<()> {
    let credential = ctx.login().await?;
    let api = ApiClient::new(Some(credential));

    let authorization = api.get_identity().await?;
    let user = &authorization.identity;
    println!(
        "\nLogged in as: {} {} ({})",
        user.first_name, user.last_name, user.email_address
    );

    let accounts: Vec<&Account> = authorization
        .accounts
        .iter()
        .filter(|a| a.is_basecamp())
        .collect();

    if accounts.len() == 1 {
        ctx.settings.default_account_id = Some(accounts[0].id.to_string());
        ctx.settings.save()?;
        println!("Set default account: {}", accounts[0].name);
    } else if accounts.len() > 1 {
        println!("\nFound {} accounts:", accounts.len());
        for account in &accounts {
            let default = if ctx.settings.default_account_id.as_deref()
                == Some(account.id.to_string().as_str())
            {
                " (default)"
            } else {
                ""
            };
            println!("  - {}{}", account.name, default);
        }
        if ctx.settings.default_account_id.is_none() {
            println!("\nRun 'bc4 account select' to set a default account.");
        }
    }
    Ok(())
}

/// Report the stored credential's state and the reachable accounts.
pub async fn status(ctx: &Context) -> Result<()> {
    let Some(credential) = ctx.oauth().store().load() else {
        println!("Not authenticated. Run 'bc4 auth login' to authenticate.");
        return Ok(());
    };

    let remaining = credential.remaining();
    if remaining <= 0 {
        println!("Authentication expired. Run 'bc4 auth login' to re-authenticate.");
        return Ok(());
    }

    let api = ApiClient::new(Some(credential));
    let authorization = api.get_identity().await?;
    let user = &authorization.identity;
    println!(
        "Authenticated as: {} {} ({})",
        user.first_name, user.last_name, user.email_address
    );
    println!("Token expires in: {} minutes", remaining / 60);

    let accounts: Vec<&Account> = authorization
        .accounts
        .iter()
        .filter(|a| a.is_basecamp())
        .collect();
    if !accounts.is_empty() {
        println!("\nAccounts ({}):", accounts.len());
        for account in accounts {
            let default = if ctx.settings.default_account_id.as_deref()
                == Some(account.id.to_string().as_str())
            {
                " (default)"
            } else {
                ""
            };
            println!("  - {} (ID: {}){}", account.name, account.id, default);
        }
    }
    Ok(())
}

/// Drop the stored credential.
pub fn logout(ctx: &Context) -> Result<()> {
    ctx.oauth().store().delete()?;
    println!("Logged out.");
    Ok(())
}
