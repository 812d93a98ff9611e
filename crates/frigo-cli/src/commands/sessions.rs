//! Session listing and renaming.

use anyhow::Result;
use colored::Colorize;

use frigo_core::chat::SessionStatus;

use crate::app::AppContext;

pub async fn list(ctx: &AppContext) -> Result<()> {
    let sessions = ctx.new_chat().list_sessions().await?;

    if sessions.is_empty() {
        println!("No sessions yet. Start one with `frigo chat`.");
        return Ok(());
    }

    for session in sessions {
        let marker = match session.status {
            SessionStatus::Active => "active".green(),
            SessionStatus::LimitReached => "limit reached".yellow(),
        };
        println!(
            "{}  {}  [{}]  {}",
            session.id.dimmed(),
            session.started_at,
            marker,
            session.title.bold()
        );
    }
    Ok(())
}

pub async fn rename(ctx: &AppContext, session_id: &str, title: &str) -> Result<()> {
    ctx.new_chat().rename_session(session_id, title).await?;
    println!("{}", "Session renamed.".green());
    Ok(())
}
