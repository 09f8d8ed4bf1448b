//! `learnverse interests`: the interest selection screen.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use learnverse_http::repo::InterestsRepository;

use crate::commands::check_form;
use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct InterestsCommand {
    #[command(subcommand)]
    pub command: InterestsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum InterestsSubcommand {
    /// Show your saved interests
    Show,

    /// List the interests you can choose from
    Available,

    /// Replace your interests (comma separated)
    Save {
        #[arg(value_delimiter = ',', required = true)]
        interests: Vec<String>,
    },

    /// Skip interest selection for now
    Skip,
}

pub async fn handle(cmd: InterestsCommand, ctx: &AppContext) -> Result<()> {
    ctx.require_session()?;
    let repo = InterestsRepository::new(ctx.client().clone());

    match cmd.command {
        InterestsSubcommand::Show => {
            let interests = repo.my_interests().await.context("Failed to load interests")?;
            print_list(&interests, "No interests saved yet.");
        }
        InterestsSubcommand::Available => {
            let interests = repo.available().await.context("Failed to load interests")?;
            print_list(&interests, "No interests available.");
        }
        InterestsSubcommand::Save { interests } => {
            let interests: Vec<String> = interests
                .into_iter()
                .map(|i| i.trim().to_string())
                .filter(|i| !i.is_empty())
                .collect();

            let view_model = ctx.view_model();
            view_model
                .save_interests(&interests)
                .await
                .context("Failed to update stored session")?;
            check_form(view_model)?;
            output::success(&format!("Saved {} interest(s)", interests.len()));
        }
        InterestsSubcommand::Skip => {
            ctx.view_model()
                .cancel_interest_selection()
                .await
                .context("Failed to update stored session")?;
            output::success("Interest selection skipped");
        }
    }

    Ok(())
}

fn print_list(interests: &[String], empty: &str) {
    if interests.is_empty() {
        output::hint(empty);
        return;
    }
    for interest in interests {
        println!("{}", interest);
    }
}
