//! `learnverse chat`: stream a reply from the learning assistant.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use futures_util::StreamExt;

use learnverse_http::repo::AssistantRepository;

use crate::context::AppContext;

#[derive(Args, Debug)]
pub struct ChatArgs {
    #[arg(required = true, num_args = 1..)]
    pub message: Vec<String>,
}

pub async fn run(args: ChatArgs, ctx: &AppContext) -> Result<()> {
    let token = ctx.access_token()?;
    let message = args.message.join(" ");

    let mut stream = AssistantRepository::new(ctx.client().clone())
        .chat(&message, &token)
        .await
        .context("Assistant request failed")?;

    let mut stdout = std::io::stdout();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("Assistant stream interrupted")?;
        write!(stdout, "{}", chunk)?;
        stdout.flush()?;
    }
    writeln!(stdout)?;

    Ok(())
}
