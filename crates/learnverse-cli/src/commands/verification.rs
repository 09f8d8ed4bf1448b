//! `learnverse verification`: tutor applications.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use learnverse_core::Email;
use learnverse_core::model::{VerificationState, VerificationStatus};
use learnverse_http::repo::{TutorApplication, TutorVerificationRepository};

use crate::commands::read_upload;
use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct VerificationCommand {
    #[command(subcommand)]
    pub command: VerificationSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum VerificationSubcommand {
    /// Check the status of an application
    Status { email: String },

    /// Apply to become a verified tutor
    Apply {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Subject you want to teach
        #[arg(long)]
        subject: String,

        /// Certificate or diploma scan
        #[arg(long)]
        document: PathBuf,
    },
}

pub async fn handle(cmd: VerificationCommand, ctx: &AppContext) -> Result<()> {
    let repo = TutorVerificationRepository::new(ctx.client().clone());

    match cmd.command {
        VerificationSubcommand::Status { email } => {
            let email = Email::new(&email)?;
            let status = repo.status(&email).await.context("Failed to load status")?;
            print_status(&status);
        }
        VerificationSubcommand::Apply {
            name,
            email,
            subject,
            document,
        } => {
            let application = TutorApplication {
                name,
                email: Email::new(&email)?,
                subject,
                document: read_upload(&document).await?,
            };
            let status = repo
                .register(application)
                .await
                .context("Failed to submit application")?;
            output::success("Application submitted");
            print_status(&status);
        }
    }

    Ok(())
}

fn print_status(status: &VerificationStatus) {
    let label = match status.status {
        VerificationState::Pending => "pending review",
        VerificationState::Approved => "approved",
        VerificationState::Rejected => "rejected",
        VerificationState::NotSubmitted => "not submitted",
    };
    output::field("Status", label);
    if let Some(reason) = &status.rejection_reason {
        output::field("Reason", reason);
    }
}
