//! `learnverse activities`: feed, filters, proximity and natural search.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use learnverse_core::model::{Activity, ActivityFilter, Page, ProximityQuery};
use learnverse_http::repo::ActivityRepository;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct ActivitiesCommand {
    #[command(subcommand)]
    pub command: ActivitiesSubcommand,

    /// Print raw JSON instead of a listing
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ActivitiesSubcommand {
    /// Activities recommended for you
    Feed,

    /// Show one activity
    Show { id: i64 },

    /// Filter by category, price and rating
    Filter(FilterArgs),

    /// Activities near a point
    Nearby(NearbyArgs),

    /// Describe what you want to learn in plain words
    Search(SearchArgs),
}

#[derive(Args, Debug)]
pub struct PageArgs {
    /// Zero-based page number
    #[arg(long, default_value_t = 0)]
    pub page: u32,

    #[arg(long, default_value_t = 20)]
    pub size: u32,
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub min_price: Option<f64>,

    #[arg(long)]
    pub max_price: Option<f64>,

    #[arg(long)]
    pub min_rating: Option<f64>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct NearbyArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Search radius in kilometres
    #[arg(long, default_value_t = 10.0)]
    pub radius: f64,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

pub async fn handle(cmd: ActivitiesCommand, ctx: &AppContext) -> Result<()> {
    ctx.require_session()?;
    let repo = ActivityRepository::new(ctx.client().clone());
    let json = cmd.json;

    match cmd.command {
        ActivitiesSubcommand::Feed => {
            let activities = repo.my_feed().await.context("Failed to load feed")?;
            print_activities(&activities, json)
        }
        ActivitiesSubcommand::Show { id } => {
            let activity = repo.get(id).await.context("Failed to load activity")?;
            if json {
                return output::json_pretty(&activity);
            }
            print_details(&activity);
            Ok(())
        }
        ActivitiesSubcommand::Filter(args) => {
            let filter = ActivityFilter {
                category: args.category,
                min_price: args.min_price,
                max_price: args.max_price,
                min_rating: args.min_rating,
                page: args.page.page,
                size: args.page.size,
            };
            let page = repo.filter(&filter).await.context("Failed to filter activities")?;
            print_page(&page, json)
        }
        ActivitiesSubcommand::Nearby(args) => {
            let query = ProximityQuery {
                latitude: args.lat,
                longitude: args.lon,
                radius_km: args.radius,
                page: args.page.page,
                size: args.page.size,
            };
            let page = repo.nearby(&query).await.context("Failed to search nearby")?;
            print_page(&page, json)
        }
        ActivitiesSubcommand::Search(args) => {
            let query = args.query.join(" ");
            let page = repo
                .search_natural(&query, args.page.page, args.page.size)
                .await
                .context("Search failed")?;
            print_page(&page, json)
        }
    }
}

fn print_page(page: &Page<Activity>, json: bool) -> Result<()> {
    if json {
        return output::json_pretty(page);
    }
    print_activities(&page.content, false)?;
    output::page_footer(page.page_number, page.total_pages, page.total_elements);
    Ok(())
}

fn print_activities(activities: &[Activity], json: bool) -> Result<()> {
    if json {
        return output::json_pretty(&activities);
    }
    if activities.is_empty() {
        output::hint("No activities found.");
        return Ok(());
    }
    for activity in activities {
        output::item(activity.id, &activity.title, &summary(activity));
    }
    Ok(())
}

fn summary(activity: &Activity) -> Vec<String> {
    let mut details = Vec::new();
    if let Some(category) = &activity.category {
        details.push(category.clone());
    }
    if let Some(price) = activity.price {
        details.push(format!("{:.2}", price));
    }
    if let Some(rating) = activity.average_rating {
        details.push(format!("★ {:.1}", rating));
    }
    details
}

fn print_details(activity: &Activity) {
    output::field("Title", &activity.title);
    if let Some(tutor) = &activity.tutor_name {
        output::field("Tutor", tutor);
    }
    for detail in summary(activity) {
        println!("  {}", detail);
    }
    if let Some(description) = &activity.description {
        println!();
        println!("{}", description);
    }
    if let Some(video) = &activity.video_url {
        output::field("Video", video);
    }
}
