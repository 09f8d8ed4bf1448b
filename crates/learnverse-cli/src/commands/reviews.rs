//! `learnverse reviews`.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use learnverse_core::model::NewReview;
use learnverse_http::repo::ReviewRepository;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct ReviewsCommand {
    #[command(subcommand)]
    pub command: ReviewsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ReviewsSubcommand {
    /// Reviews of an activity
    List { activity_id: i64 },

    /// Review an activity you attended
    Add {
        activity_id: i64,

        /// 1 to 5 stars
        #[arg(long)]
        rating: u8,

        #[arg(long)]
        comment: Option<String>,
    },
}

pub async fn handle(cmd: ReviewsCommand, ctx: &AppContext) -> Result<()> {
    ctx.require_session()?;
    let repo = ReviewRepository::new(ctx.client().clone());

    match cmd.command {
        ReviewsSubcommand::List { activity_id } => {
            let reviews = repo.list(activity_id).await.context("Failed to load reviews")?;
            if reviews.is_empty() {
                output::hint("No reviews yet.");
            }
            for review in &reviews {
                let stars = "★".repeat(review.rating as usize);
                let author = review.author_name.as_deref().unwrap_or("anonymous");
                println!("{} {}", stars, author);
                if let Some(comment) = &review.comment {
                    println!("  {}", comment);
                }
            }
        }
        ReviewsSubcommand::Add {
            activity_id,
            rating,
            comment,
        } => {
            let review = NewReview::new(rating, comment)?;
            repo.submit(activity_id, &review)
                .await
                .context("Failed to submit review")?;
            output::success("Review submitted");
        }
    }

    Ok(())
}
