//! Profile display and update.

use anyhow::Result;
use colored::Colorize;

use frigo_core::auth::User;

use crate::app::AppContext;

pub async fn run(
    ctx: &AppContext,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<()> {
    let user = if first_name.is_some() || last_name.is_some() {
        let user = ctx.auth.update_profile(first_name, last_name).await?;
        println!("{}", "Profile updated.".green());
        user
    } else {
        ctx.auth.profile().await?
    };

    print_user(&user);
    Ok(())
}

fn print_user(user: &User) {
    println!("{} {}", user.first_name.bold(), user.last_name.bold());
    println!("  email:  {}", user.email);
    if let Some(joined) = &user.date_joined {
        println!("  joined: {}", joined);
    }
}
