//! Admin command line for a portfolio data directory.
//!
//! ```text
//! portfolio-store [--config store.yaml] init
//! portfolio-store [--config store.yaml] posts [PAGE]
//! portfolio-store [--config store.yaml] comments TITLE
//! portfolio-store [--config store.yaml] visitors
//! portfolio-store [--config store.yaml] delete-post ID
//! portfolio-store [--config store.yaml] locate IP
//! ```

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use portfolio_store::io::geolocation::{GeoLocator, IpInfoLocator};
use portfolio_store::{initialize, AppState, StoreConfig, VisitorProfileRepository, VisitorProfileStorage};
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "portfolio-store")]
#[command(about = "Inspect and maintain a portfolio data directory")]
#[command(version)]
struct Args {
    /// YAML store configuration; defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Create the data directory and every table
    Init,

    /// List blog posts, newest first
    Posts {
        /// 1-based page number
        #[arg(default_value_t = 1)]
        page: usize,
    },

    /// Show the comments on a post
    Comments {
        /// Exact post title
        title: String,
    },

    /// List visitor profiles
    Visitors,

    /// Delete a blog post by id
    DeletePost { id: String },

    /// Look up the location of an IP address
    Locate { ip_address: String },
}

fn open(config: StoreConfig) -> Result<AppState> {
    info!("Opening data directory {}", config.data_directory.display());
    initialize(config)
}

async fn run(config: StoreConfig, command: Command) -> Result<()> {
    match command {
        Command::Init => {
            let state = open(config)?;
            info!("Tables ready in {}", state.connection.config().data_directory.display());
        }
        Command::Posts { page } => {
            let state = open(config)?;
            let page = state.blog_service.page(page)?;
            println!("Page {} of {} ({} posts)", page.number, page.num_pages, page.total);
            for post in &page.posts {
                println!("{}  {}  {} by {}", post.id, post.published_date, post.title, post.author);
                println!("    {}", post.content_preview());
            }
        }
        Command::Comments { title } => {
            let state = open(config)?;
            let posts = state.blog_service.list()?;
            let Some(post) = posts.into_iter().find(|post| post.title == title) else {
                bail!("No post titled {:?}", title);
            };
            if let Some(detail) = state.blog_service.detail(&post.id)? {
                for comment in detail.comments {
                    println!("{}  {}: {}", comment.created_at, comment.author, comment.text);
                }
            }
        }
        Command::Visitors => {
            let state = open(config)?;
            let profiles = VisitorProfileRepository::new(state.connection.clone()).all()?;
            for profile in profiles {
                println!(
                    "{}  {}  {}  {}/{}  {} pages",
                    profile.session_id,
                    profile.device_type,
                    profile.ip_address,
                    profile.country,
                    profile.region,
                    profile.page_urls.len()
                );
            }
        }
        Command::DeletePost { id } => {
            let state = open(config)?;
            if state.blog_service.delete_post(&id)? {
                info!("Deleted post {}", id);
            } else {
                bail!("No post with id {}", id);
            }
        }
        // Lookups do not touch the data directory
        Command::Locate { ip_address } => {
            let locator = IpInfoLocator::new(&config.geolocation)?;
            let location = locator.lookup(&ip_address).await;
            println!("{}  {}/{}", ip_address, location.country, location.region);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };

    run(config, args.command.unwrap_or(Command::Init)).await
}
