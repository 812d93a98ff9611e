use anyhow::Result;
use clap::{Parser, Subcommand};

mod app;
mod commands;
mod input;
mod logging;
mod repl;

use app::AppContext;

#[derive(Parser)]
#[command(name = "frigo")]
#[command(about = "Frigo - cold storage advisory chat", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account
    Signup,
    /// Log in with email and password
    Login,
    /// Log out and drop the stored session
    Logout,
    /// Reset a forgotten password via email OTP
    ForgotPassword,
    /// Show or update the user profile
    Profile {
        /// New first name
        #[arg(long)]
        first_name: Option<String>,
        /// New last name
        #[arg(long)]
        last_name: Option<String>,
    },
    /// List chat sessions
    Sessions,
    /// Rename a chat session
    Rename {
        /// Session id
        session_id: String,
        /// New title
        title: String,
    },
    /// Start or resume an advisory chat
    Chat {
        /// Resume an existing session instead of starting a new one
        #[arg(long)]
        session: Option<String>,
        /// Talk to Gemini directly instead of the advisory backend
        #[arg(long)]
        direct: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let ctx = AppContext::build()?;
    let _log_guard = logging::init(&ctx.paths)?;

    match cli.command {
        Commands::Signup => commands::auth::signup(&ctx).await?,
        Commands::Login => commands::auth::login(&ctx).await?,
        Commands::Logout => commands::auth::logout(&ctx)?,
        Commands::ForgotPassword => commands::auth::forgot_password(&ctx).await?,
        Commands::Profile {
            first_name,
            last_name,
        } => commands::profile::run(&ctx, first_name.as_deref(), last_name.as_deref()).await?,
        Commands::Sessions => commands::sessions::list(&ctx).await?,
        Commands::Rename { session_id, title } => {
            commands::sessions::rename(&ctx, &session_id, &title).await?
        }
        Commands::Chat { session, direct } => {
            commands::chat::run(&ctx, session.as_deref(), direct).await?
        }
    }

    Ok(())
}
