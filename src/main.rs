//! bc4 - Basecamp from the command line
//!
//! Authenticate once with OAuth2, then list projects, manage todos, post
//! messages and chat lines.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bc4::cli::{commands, Context};

/// bc4 - Manage Basecamp from the command line
#[derive(Parser, Debug)]
#[command(name = "bc4")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug)
    #[arg(short = 'd', long, global = true)]
    debug: bool,

    /// Enable verbose (trace-level) logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authentication commands
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommand),
    /// Project commands, or `bc4 project <pattern>` to find one by name
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Todo commands
    #[command(subcommand)]
    Todo(TodoCommand),
    /// Message board commands
    #[command(subcommand)]
    Message(MessageCommand),
    /// Campfire chat commands
    #[command(subcommand)]
    Campfire(CampfireCommand),
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Log in to Basecamp
    Login,
    /// Show authentication status
    Status,
    /// Remove the stored credential
    Logout,
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    /// List all accounts
    List,
    /// Select default account
    Select,
}

#[derive(Subcommand, Debug)]
enum ProjectCommand {
    /// List all projects
    List {
        /// Account ID (uses default if not specified)
        #[arg(long)]
        account: Option<String>,
    },
    /// Select default project
    Select {
        /// Account ID
        #[arg(long)]
        account: Option<String>,
    },
    /// Find and select a project by name fragment
    #[command(external_subcommand)]
    Find(Vec<String>),
}

#[derive(Subcommand, Debug)]
enum TodoCommand {
    /// Create todos interactively
    Create {
        /// Account ID
        #[arg(long)]
        account: Option<String>,
        /// Project ID
        #[arg(long)]
        project: Option<String>,
    },
    /// List todos in a project
    List {
        /// Project name (partial match)
        project_name: Option<String>,
        /// Account ID
        #[arg(long)]
        account: Option<String>,
        /// Project ID
        #[arg(long)]
        project: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum MessageCommand {
    /// Post a message
    Post {
        /// Account ID
        #[arg(long)]
        account: Option<String>,
        /// Project ID
        #[arg(long)]
        project: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum CampfireCommand {
    /// Post to campfire
    Post {
        /// Project name (partial match)
        project_name: Option<String>,
        /// Message to post (or leave empty for interactive)
        message: Vec<String>,
        /// Account ID
        #[arg(long)]
        account: Option<String>,
        /// Project ID
        #[arg(long)]
        project: Option<String>,
    },
    /// Post a formatted update to campfire
    Update {
        /// Account ID
        #[arg(long)]
        account: Option<String>,
        /// Project ID
        #[arg(long)]
        project: Option<String>,
    },
}

fn init_tracing(cli: &Cli) {
    let default_filter = if cli.verbose {
        "trace"
    } else if cli.debug {
        "debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let mut ctx = Context::new()?;

    match cli.command {
        Command::Auth(cmd) => match cmd {
            AuthCommand::Login => commands::auth::login(&mut ctx).await?,
            AuthCommand::Status => commands::auth::status(&ctx).await?,
            AuthCommand::Logout => commands::auth::logout(&ctx)?,
        },
        Command::Account(cmd) => match cmd {
            AccountCommand::List => commands::account::list(&ctx).await?,
            AccountCommand::Select => commands::account::select(&mut ctx).await?,
        },
        Command::Project(cmd) => match cmd {
            ProjectCommand::List { account } => commands::project::list(&ctx, account).await?,
            ProjectCommand::Select { account } => {
                commands::project::select(&mut ctx, account).await?
            }
            ProjectCommand::Find(args) => {
                commands::project::find(&mut ctx, &args.join(" ")).await?
            }
        },
        Command::Todo(cmd) => match cmd {
            TodoCommand::Create { account, project } => {
                commands::todo::create(&mut ctx, account, project).await?
            }
            TodoCommand::List {
                project_name,
                account,
                project,
            } => commands::todo::list(&mut ctx, project_name, account, project).await?,
        },
        Command::Message(cmd) => match cmd {
            MessageCommand::Post { account, project } => {
                commands::message::post(&ctx, account, project).await?
            }
        },
        Command::Campfire(cmd) => match cmd {
            CampfireCommand::Post {
                project_name,
                message,
                account,
                project,
            } => commands::campfire::post(&mut ctx, project_name, message, account, project).await?,
            CampfireCommand::Update { account, project } => {
                commands::campfire::update(&ctx, account, project).await?
            }
        },
    }

    Ok(())
}
