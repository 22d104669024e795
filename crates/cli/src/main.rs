// ABOUTME: CLI for browsing the Channel One catalog with efir-catalog.
// ABOUTME: Stands in for the host rendering layer: drives the extractors and prints JSON.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use efir_catalog::{
    fetch_listing, list_show_menu, list_shows_by_letter, resolve_video, Client, ExternalResolver,
    ScrapeError, VideoTarget,
};

/// Browse the Channel One catalog and print JSON.
#[derive(Parser, Debug)]
#[command(name = "efir-cli")]
#[command(about = "Scrape the Channel One catalog and print JSON", long_about = None)]
struct Args {
    /// Override the site base URL (useful against a local fixture server).
    #[arg(long)]
    base_url: Option<String>,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the alphabetical show index.
    Shows,
    /// Print the menu entries of a show page.
    Menu {
        /// Show page URL or path, e.g. /shows/bolshaya-igra
        show_url: String,
    },
    /// Print one or more pages of an episode listing.
    Episodes {
        /// Listing URL or path, may carry limit/offset parameters.
        url: String,
        /// Follow next-page cursors until exhausted.
        #[arg(long, default_value_t = false)]
        follow: bool,
        /// Upper bound on pages fetched with --follow.
        #[arg(long, default_value_t = 10)]
        max_pages: usize,
    },
    /// Resolve a video id into a playable target.
    Video {
        /// Numeric video id from an episode record.
        id: String,
    },
}

/// The CLI has no embedded player, so third-party embeds cannot be resolved
/// here; the error names the link so the caller can follow it elsewhere.
struct NoExternalResolver;

impl ExternalResolver for NoExternalResolver {
    fn resolve(&self, embed_url: &str) -> Result<VideoTarget, ScrapeError> {
        Err(ScrapeError::playlist(
            embed_url,
            "ResolveExternal",
            Some(anyhow!("external source resolution is not available in the CLI")),
        ))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut builder = Client::builder();
    if let Some(base_url) = &args.base_url {
        builder = builder.base_url(base_url.as_str());
    }
    let client = builder.build()?;

    let output = match &args.command {
        Command::Shows => {
            let groups = list_shows_by_letter(&client)?;
            json!({ "groups": groups })
        }
        Command::Menu { show_url } => {
            let entries = list_show_menu(&client, show_url)?;
            json!({ "entries": entries })
        }
        Command::Episodes {
            url,
            follow,
            max_pages,
        } => {
            let mut items = Vec::new();
            let mut next_url;
            let mut pages = 0usize;
            let mut current = url.clone();

            loop {
                let page = fetch_listing(&client, &current)?;
                items.extend(page.items);
                next_url = page.next_url;
                pages += 1;

                if !*follow || pages >= *max_pages {
                    break;
                }
                match &next_url {
                    Some(next) => current = next.clone(),
                    None => break,
                }
            }

            json!({ "items": items, "next_url": next_url, "pages": pages })
        }
        Command::Video { id } => {
            let target = resolve_video(&client, id, &NoExternalResolver)?;
            json!(target)
        }
    };

    if args.compact {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}
