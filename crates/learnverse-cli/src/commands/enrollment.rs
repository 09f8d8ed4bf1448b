//! `learnverse enroll` and `learnverse enrollments`.

use anyhow::{Context, Result};
use clap::Args;

use learnverse_http::repo::EnrollmentRepository;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct EnrollArgs {
    /// Activity to enroll in
    pub activity_id: i64,
}

#[derive(Args, Debug)]
pub struct EnrollmentsArgs {
    /// Print raw JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn enroll(args: EnrollArgs, ctx: &AppContext) -> Result<()> {
    ctx.require_session()?;
    let enrollment = EnrollmentRepository::new(ctx.client().clone())
        .enroll(args.activity_id)
        .await
        .context("Enrollment failed")?;

    output::success(&format!("Enrolled in activity #{}", enrollment.activity_id));
    Ok(())
}

pub async fn list(args: EnrollmentsArgs, ctx: &AppContext) -> Result<()> {
    ctx.require_session()?;
    let enrollments = EnrollmentRepository::new(ctx.client().clone())
        .my_enrollments()
        .await
        .context("Failed to load enrollments")?;

    if args.json {
        return output::json_pretty(&enrollments);
    }
    if enrollments.is_empty() {
        output::hint("You are not enrolled in anything yet.");
        return Ok(());
    }

    for enrollment in &enrollments {
        let title = enrollment
            .activity_title
            .clone()
            .unwrap_or_else(|| format!("Activity #{}", enrollment.activity_id));
        let since = enrollment
            .enrolled_at
            .map(|at| vec![at.format("%Y-%m-%d").to_string()])
            .unwrap_or_default();
        output::item(enrollment.id, &title, &since);
    }
    Ok(())
}
