//! `learnverse auth`: the login, registration and session screens.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use learnverse_core::SessionState;
use learnverse_http::TokenRefresher;

use crate::commands::check_form;
use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Log in with email and password
    Login(LoginArgs),

    /// Create a new account
    Register(RegisterArgs),

    /// Log out and forget the stored tokens
    Logout,

    /// Show the current session
    Status,

    /// Exchange the refresh token for a new token pair now
    Refresh,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long, env = "LEARNVERSE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Display name
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, env = "LEARNVERSE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn handle(cmd: AuthCommand, ctx: &AppContext) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login(args) => login(args, ctx).await,
        AuthSubcommand::Register(args) => register(args, ctx).await,
        AuthSubcommand::Logout => logout(ctx).await,
        AuthSubcommand::Status => status(ctx),
        AuthSubcommand::Refresh => refresh(ctx).await,
    }
}

async fn login(args: LoginArgs, ctx: &AppContext) -> Result<()> {
    output::hint("Logging in...");

    let view_model = ctx.view_model();
    view_model
        .login(&args.email, &args.password)
        .await
        .context("Failed to store credentials")?;
    check_form(view_model)?;

    output::success("Logged in");
    print_next_step(view_model.session_state());
    Ok(())
}

async fn register(args: RegisterArgs, ctx: &AppContext) -> Result<()> {
    output::hint("Creating account...");

    let view_model = ctx.view_model();
    view_model
        .register(&args.name, &args.email, &args.password)
        .await
        .context("Failed to store credentials")?;
    check_form(view_model)?;

    output::success("Account created");
    print_next_step(view_model.session_state());
    Ok(())
}

async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.view_model()
        .logout()
        .await
        .context("Failed to clear stored credentials")?;
    output::success("Logged out");
    Ok(())
}

fn status(ctx: &AppContext) -> Result<()> {
    let record = ctx.client().store().record();

    output::field("API", ctx.client().base_url().as_str());
    output::field("Session", &ctx.view_model().session_state().to_string());
    output::field("Access token", stored(record.has_access_token()));
    output::field("Refresh token", stored(record.refresh_token.is_some()));
    output::field(
        "Interests skipped",
        if record.interests_skipped { "yes" } else { "no" },
    );
    Ok(())
}

async fn refresh(ctx: &AppContext) -> Result<()> {
    let store = ctx.client().store();
    let token = store
        .refresh_token()
        .filter(|t| !t.is_blank())
        .context("No refresh token stored. Run 'learnverse auth login' first.")?;

    output::hint("Refreshing session...");

    let refresher = TokenRefresher::new(ctx.client().config())?;
    let pair = refresher
        .refresh(&token)
        .await
        .context("Failed to refresh session")?;
    store
        .save_tokens(pair.access, pair.refresh)
        .await
        .context("Failed to save refreshed tokens")?;

    output::success("Session refreshed");
    Ok(())
}

fn print_next_step(state: SessionState) {
    output::field("Session", &state.to_string());
    if state == SessionState::NeedsInterestSelection {
        output::hint(
            "Pick some interests with 'learnverse interests save <a,b,...>' \
             or 'learnverse interests skip'.",
        );
    }
}

fn stored(present: bool) -> &'static str {
    if present { "stored" } else { "none" }
}
