//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::activities::ActivitiesCommand;
use crate::commands::admin::AdminCommand;
use crate::commands::auth::AuthCommand;
use crate::commands::chat::ChatArgs;
use crate::commands::community::CommunityCommand;
use crate::commands::enrollment::{EnrollArgs, EnrollmentsArgs};
use crate::commands::interests::InterestsCommand;
use crate::commands::reviews::ReviewsCommand;
use crate::commands::verification::VerificationCommand;

/// Production API used when neither `--api` nor `LEARNVERSE_API` is set.
pub const DEFAULT_API: &str = "https://api.learnverse.app";

/// LearnVerse marketplace client.
#[derive(Parser, Debug)]
#[command(name = "learnverse")]
#[command(author, version = env!("LEARNVERSE_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// API base URL
    #[arg(long, env = "LEARNVERSE_API", default_value = DEFAULT_API, global = true)]
    pub api: String,

    /// Directory holding the stored credentials
    #[arg(long, env = "LEARNVERSE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in, register, log out and inspect the session
    Auth(AuthCommand),

    /// Choose the topics your feed is built from
    Interests(InterestsCommand),

    /// Browse and search activities
    Activities(ActivitiesCommand),

    /// Enroll in an activity
    Enroll(EnrollArgs),

    /// List your enrollments
    Enrollments(EnrollmentsArgs),

    /// Read and write activity reviews
    Reviews(ReviewsCommand),

    /// Community feed, posts and comments
    Community(CommunityCommand),

    /// Tutor verification applications
    Verification(VerificationCommand),

    /// Review tutor verifications (admin accounts)
    Admin(AdminCommand),

    /// Ask the learning assistant; the reply streams to stdout
    Chat(ChatArgs),
}
