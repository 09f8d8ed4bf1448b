//! `learnverse community`: the social feed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use learnverse_http::repo::CommunityRepository;

use crate::commands::read_upload;
use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct CommunityCommand {
    #[command(subcommand)]
    pub command: CommunitySubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CommunitySubcommand {
    /// Latest posts
    Feed {
        #[arg(long, default_value_t = 0)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        size: u32,
    },

    /// Publish a post, optionally with an image
    Post {
        content: String,

        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Show or add comments on a post
    Comment {
        post_id: i64,

        /// Comment text; omit to list the existing comments
        content: Option<String>,
    },

    /// Like a post
    Like {
        post_id: i64,

        /// Remove the like instead
        #[arg(long)]
        undo: bool,
    },

    /// Follow a user
    Follow {
        user_id: i64,

        /// Unfollow instead
        #[arg(long)]
        undo: bool,
    },
}

pub async fn handle(cmd: CommunityCommand, ctx: &AppContext) -> Result<()> {
    ctx.require_session()?;
    let repo = CommunityRepository::new(ctx.client().clone());

    match cmd.command {
        CommunitySubcommand::Feed { page, size } => {
            let posts = repo.feed(page, size).await.context("Failed to load feed")?;
            if posts.content.is_empty() {
                output::hint("Nothing here yet.");
            }
            for post in &posts.content {
                let details = vec![
                    format!("♥ {}", post.like_count),
                    format!("💬 {}", post.comment_count),
                ];
                output::item(post.id, &post.author_name, &details);
                println!("  {}", post.content);
                if let Some(image) = &post.image_url {
                    println!("  {}", image);
                }
            }
            output::page_footer(posts.page_number, posts.total_pages, posts.total_elements);
        }
        CommunitySubcommand::Post { content, image } => {
            let image = match image {
                Some(path) => Some(read_upload(&path).await?),
                None => None,
            };
            let post = repo
                .create_post(&content, image)
                .await
                .context("Failed to publish post")?;
            output::success(&format!("Published post #{}", post.id));
        }
        CommunitySubcommand::Comment {
            post_id,
            content: Some(content),
        } => {
            repo.add_comment(post_id, &content)
                .await
                .context("Failed to add comment")?;
            output::success("Comment added");
        }
        CommunitySubcommand::Comment {
            post_id,
            content: None,
        } => {
            let comments = repo.comments(post_id).await.context("Failed to load comments")?;
            if comments.is_empty() {
                output::hint("No comments yet.");
            }
            for comment in &comments {
                output::item(comment.id, &comment.author_name, &[]);
                println!("  {}", comment.content);
            }
        }
        CommunitySubcommand::Like { post_id, undo } => {
            if undo {
                repo.unlike(post_id).await.context("Failed to remove like")?;
                output::success("Like removed");
            } else {
                repo.like(post_id).await.context("Failed to like post")?;
                output::success("Liked");
            }
        }
        CommunitySubcommand::Follow { user_id, undo } => {
            if undo {
                repo.unfollow(user_id).await.context("Failed to unfollow")?;
                output::success("Unfollowed");
            } else {
                repo.follow(user_id).await.context("Failed to follow")?;
                output::success("Following");
            }
        }
    }

    Ok(())
}
