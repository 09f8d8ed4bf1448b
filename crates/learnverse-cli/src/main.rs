//! learnverse - command-line client for the LearnVerse marketplace.
//!
//! Each subcommand stands in for one screen of the app: it drives the auth
//! view-model or a repository from `learnverse-http` and prints the result.

mod cli;
mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{activities, admin, auth, chat, community, enrollment, interests, reviews, verification};
use context::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let ctx = AppContext::open(&cli.api, cli.data_dir.as_deref()).await?;

    let result = match cli.command {
        Commands::Auth(cmd) => auth::handle(cmd, &ctx).await,
        Commands::Interests(cmd) => interests::handle(cmd, &ctx).await,
        Commands::Activities(cmd) => activities::handle(cmd, &ctx).await,
        Commands::Enroll(args) => enrollment::enroll(args, &ctx).await,
        Commands::Enrollments(args) => enrollment::list(args, &ctx).await,
        Commands::Reviews(cmd) => reviews::handle(cmd, &ctx).await,
        Commands::Community(cmd) => community::handle(cmd, &ctx).await,
        Commands::Verification(cmd) => verification::handle(cmd, &ctx).await,
        Commands::Admin(cmd) => admin::handle(cmd, &ctx).await,
        Commands::Chat(args) => chat::run(args, &ctx).await,
    };

    ctx.finish().await?;
    result
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so command output on stdout stays parseable.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
