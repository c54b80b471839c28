use clap::Subcommand;
use uuid::Uuid;

use crate::cli::utils::{
    output_empty_collection, output_json, output_notice, print_listing_detail, print_listings,
};
use crate::cli::{CliSession, OutputFormat};
use crate::handlers::public::properties::{DETAIL_FAILED, LOAD_FAILED};
use crate::listing::{FilterCriteria, ListingBrowser};

#[derive(Subcommand)]
pub enum PropertiesCommands {
    #[command(about = "List available properties, newest first")]
    List {
        #[arg(long, help = "Location contains (case-insensitive)")]
        location: Option<String>,
        #[arg(long = "type", help = "PG, Flat, Room or all")]
        category: Option<String>,
        #[arg(long, help = "Maximum monthly rent")]
        max_rent: Option<String>,
    },

    #[command(about = "Show one property with the owner's contact details")]
    Show {
        #[arg(help = "Property id")]
        id: Uuid,
    },
}

pub async fn handle(cmd: PropertiesCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = CliSession::open().await?;
    let repo = session.repository();

    match cmd {
        PropertiesCommands::List {
            location,
            category,
            max_rent,
        } => {
            let criteria = FilterCriteria::from_raw(
                location.as_deref().unwrap_or_default(),
                category.as_deref().unwrap_or("all"),
                max_rent.as_deref().unwrap_or_default(),
            );

            let listings = match repo.available_listings().await {
                Ok(listings) => listings,
                Err(e) => {
                    tracing::warn!("Browse load failed: {}", e);
                    output_notice(&output_format, LOAD_FAILED)?;
                    Vec::new()
                }
            };
            let mut browser = ListingBrowser::new(listings);
            browser.set_criteria(criteria);

            if browser.visible().is_empty() {
                return output_empty_collection(
                    &output_format,
                    "properties",
                    "No properties match your filters",
                );
            }
            match output_format {
                OutputFormat::Json => output_json(&browser.visible()),
                OutputFormat::Text => {
                    print_listings(browser.visible());
                    println!("{} of {} properties", browser.visible().len(), browser.total());
                    Ok(())
                }
            }
        }
        PropertiesCommands::Show { id } => {
            let listing = repo.listing_detail(id).await.map_err(|e| {
                tracing::warn!("Detail load for {} failed: {}", id, e);
                anyhow::anyhow!(DETAIL_FAILED)
            })?;
            match output_format {
                OutputFormat::Json => output_json(&listing),
                OutputFormat::Text => {
                    print_listing_detail(&listing);
                    Ok(())
                }
            }
        }
    }
}
