//! Account commands: signup, login, logout and the password-reset flow.

use anyhow::{Result, bail};
use colored::Colorize;
use rustyline::DefaultEditor;

use frigo_core::auth::SignupRequest;

use crate::app::AppContext;
use crate::input::read_required;

pub async fn signup(ctx: &AppContext) -> Result<()> {
    let mut editor = DefaultEditor::new()?;

    let Some(first_name) = read_required(&mut editor, "First name: ")? else {
        return Ok(());
    };
    let Some(last_name) = read_required(&mut editor, "Last name: ")? else {
        return Ok(());
    };
    let Some(email) = read_required(&mut editor, "Email: ")? else {
        return Ok(());
    };
    let Some(password) = read_required(&mut editor, "Password: ")? else {
        return Ok(());
    };
    let Some(password2) = read_required(&mut editor, "Confirm password: ")? else {
        return Ok(());
    };

    if password != password2 {
        bail!("Passwords do not match");
    }

    let session = ctx
        .auth
        .signup(&SignupRequest {
            first_name,
            last_name,
            email,
            password,
            password2,
        })
        .await?;

    println!(
        "{}",
        format!("Welcome, {}! You are logged in.", session.user.first_name).green()
    );
    Ok(())
}

pub async fn login(ctx: &AppContext) -> Result<()> {
    let mut editor = DefaultEditor::new()?;

    let Some(email) = read_required(&mut editor, "Email: ")? else {
        return Ok(());
    };
    let Some(password) = read_required(&mut editor, "Password: ")? else {
        return Ok(());
    };

    let session = ctx.auth.login(&email, &password).await?;
    println!(
        "{}",
        format!("Logged in as {}.", session.user.email).green()
    );
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    ctx.auth.logout()?;
    println!("Logged out.");
    Ok(())
}

pub async fn forgot_password(ctx: &AppContext) -> Result<()> {
    let mut editor = DefaultEditor::new()?;

    let Some(email) = read_required(&mut editor, "Email: ")? else {
        return Ok(());
    };

    let dispatch = ctx.auth.forgot_password(&email).await?;
    println!(
        "An OTP was sent to {} (valid for {} minutes).",
        dispatch.email, dispatch.otp_expires_in_minutes
    );

    let Some(otp) = read_required(&mut editor, "OTP: ")? else {
        return Ok(());
    };
    if !ctx.auth.verify_otp(&email, &otp).await? {
        bail!("The OTP could not be verified");
    }

    let Some(new_password) = read_required(&mut editor, "New password: ")? else {
        return Ok(());
    };
    let Some(confirm) = read_required(&mut editor, "Confirm password: ")? else {
        return Ok(());
    };

    if ctx
        .auth
        .reset_password(&email, &otp, &new_password, &confirm)
        .await?
    {
        println!("{}", "Password reset. You can log in now.".green());
    } else {
        bail!("The password could not be reset");
    }
    Ok(())
}
