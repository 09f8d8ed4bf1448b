//! `learnverse admin`: tutor verification review.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use learnverse_http::repo::{AdminRepository, DocumentRepository};

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct AdminCommand {
    #[command(subcommand)]
    pub command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AdminSubcommand {
    /// Applications waiting for review
    Pending {
        #[arg(long)]
        json: bool,
    },

    /// Approve an application
    Approve { id: i64 },

    /// Reject an application
    Reject {
        id: i64,

        #[arg(long)]
        reason: String,
    },

    /// Download an application's document
    Document {
        url: String,

        /// Where to write the file
        #[arg(long, short)]
        output: PathBuf,
    },
}

pub async fn handle(cmd: AdminCommand, ctx: &AppContext) -> Result<()> {
    ctx.require_session()?;
    let repo = AdminRepository::new(ctx.client().clone());

    match cmd.command {
        AdminSubcommand::Pending { json } => {
            let pending = repo
                .pending_verifications()
                .await
                .context("Failed to load pending applications")?;
            if json {
                return output::json_pretty(&pending);
            }
            if pending.is_empty() {
                output::hint("No applications waiting.");
            }
            for verification in &pending {
                let mut details = vec![verification.email.clone()];
                details.extend(verification.subject.clone());
                output::item(verification.id, &verification.name, &details);
                if let Some(url) = &verification.document_url {
                    println!("  {}", url);
                }
            }
        }
        AdminSubcommand::Approve { id } => {
            repo.approve(id).await.context("Failed to approve")?;
            output::success(&format!("Approved application #{}", id));
        }
        AdminSubcommand::Reject { id, reason } => {
            repo.reject(id, &reason).await.context("Failed to reject")?;
            output::success(&format!("Rejected application #{}", id));
        }
        AdminSubcommand::Document { url, output: path } => {
            let token = ctx.access_token()?;
            let bytes = DocumentRepository::new(ctx.client().clone())
                .fetch(&url, &token)
                .await
                .context("Failed to download document")?;
            tokio::fs::write(&path, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output::success(&format!("Saved {} bytes to {}", bytes.len(), path.display()));
        }
    }

    Ok(())
}
