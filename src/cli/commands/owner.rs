use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::utils::{confirm, output_empty_collection, output_json, output_notice, output_success, print_listings};
use crate::cli::{CliSession, OutputFormat};
use crate::dashboard::OwnerDashboard;
use crate::listing::{DeleteRequest, PropertyDraft, PropertyEditor};
use crate::models::Role;

#[derive(Subcommand)]
pub enum OwnerCommands {
    #[command(about = "List your properties")]
    List,

    #[command(about = "Add a property")]
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        location: String,
        #[arg(long, help = "Monthly rent")]
        rent: String,
        #[arg(long = "type", default_value = "PG", help = "PG, Flat or Room")]
        category: String,
        #[arg(long)]
        description: String,
        #[arg(long, help = "List as not currently available")]
        unavailable: bool,
    },

    #[command(about = "Edit one of your properties; omitted fields keep their value")]
    Edit {
        #[arg(help = "Property id")]
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        rent: Option<String>,
        #[arg(long = "type")]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, help = "Mark as available (true) or not (false)")]
        available: Option<bool>,
    },

    #[command(about = "Delete one of your properties")]
    Delete {
        #[arg(help = "Property id")]
        id: Uuid,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

pub async fn handle(cmd: OwnerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = CliSession::open().await?;
    let state = session.state();
    let owner = state.require(Role::Owner)?.clone();
    let repo = session.repository();
    let mut dashboard = OwnerDashboard::open(repo.clone(), &state).await?;

    match cmd {
        OwnerCommands::List => {
            let view = dashboard.view();
            if let Some(notice) = &view.notice {
                output_notice(&output_format, notice)?;
            }
            if view.data.is_empty() {
                return output_empty_collection(
                    &output_format,
                    "properties",
                    "You haven't listed any properties yet",
                );
            }
            match output_format {
                OutputFormat::Json => output_json(view),
                OutputFormat::Text => {
                    print_listings(&view.data);
                    Ok(())
                }
            }
        }
        OwnerCommands::Add {
            title,
            location,
            rent,
            category,
            description,
            unavailable,
        } => {
            let mut editor = PropertyEditor::new();
            editor.open_new();
            *editor.draft_mut() = PropertyDraft {
                title,
                location,
                rent,
                category,
                description,
                is_available: !unavailable,
            };
            let listing = editor.submit(&repo, &owner).await?;
            output_success(
                &output_format,
                "Property added successfully",
                Some(json!({ "property": listing })),
            )
        }
        OwnerCommands::Edit {
            id,
            title,
            location,
            rent,
            category,
            description,
            available,
        } => {
            let current = dashboard
                .view()
                .data
                .iter()
                .find(|listing| listing.id == id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Property {} is not one of your listings", id))?;

            let mut editor = PropertyEditor::new();
            editor.open_edit(&current);
            let draft = editor.draft_mut();
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(location) = location {
                draft.location = location;
            }
            if let Some(rent) = rent {
                draft.rent = rent;
            }
            if let Some(category) = category {
                draft.category = category;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(available) = available {
                draft.is_available = available;
            }

            let listing = editor.submit(&repo, &owner).await?;
            output_success(
                &output_format,
                "Property updated successfully",
                Some(json!({ "property": listing })),
            )
        }
        OwnerCommands::Delete { id, yes } => {
            let request = DeleteRequest::new(id);
            if !yes && !confirm("Are you sure you want to delete this property?")? {
                return output_success(&output_format, "Delete cancelled", None);
            }
            dashboard.delete(request.confirm()).await?;
            output_success(
                &output_format,
                "Property deleted successfully",
                Some(json!({ "remaining": dashboard.view().data.len() })),
            )
        }
    }
}
