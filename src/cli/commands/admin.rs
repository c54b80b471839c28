use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::utils::{confirm, output_json, output_notice, output_success, print_listings};
use crate::cli::{CliSession, OutputFormat};
use crate::dashboard::AdminDashboard;
use crate::listing::DeleteRequest;

#[derive(Subcommand)]
pub enum AdminCommands {
    #[command(about = "Show users, properties and contact messages")]
    Dashboard,

    #[command(about = "Delete any property")]
    Delete {
        #[arg(help = "Property id")]
        id: Uuid,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

pub async fn handle(cmd: AdminCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = CliSession::open().await?;
    let mut dashboard = AdminDashboard::open(session.repository(), &session.state()).await?;

    match cmd {
        AdminCommands::Dashboard => {
            let view = dashboard.view();
            if let Some(notice) = &view.notice {
                output_notice(&output_format, notice)?;
            }
            let counts = dashboard.counts();
            match output_format {
                OutputFormat::Json => output_json(&json!({ "counts": counts, "dashboard": view })),
                OutputFormat::Text => {
                    println!(
                        "Users: {}  Properties: {}  Messages: {}",
                        counts.users, counts.properties, counts.messages
                    );

                    println!("\nUsers");
                    for profile in &view.data.profiles {
                        println!(
                            "  {:<24} {:<32} {}",
                            profile.name,
                            profile.email,
                            profile.phone.as_deref().unwrap_or("-")
                        );
                    }

                    println!("\nProperties");
                    print_listings(&view.data.listings);

                    println!("\nMessages");
                    for message in &view.data.contacts {
                        println!(
                            "  {}  {} <{}>: {}",
                            message.created_at.format("%Y-%m-%d"),
                            message.name,
                            message.email,
                            message.message
                        );
                    }
                    Ok(())
                }
            }
        }
        AdminCommands::Delete { id, yes } => {
            let request = DeleteRequest::new(id);
            if !yes && !confirm("Are you sure you want to delete this property?")? {
                return output_success(&output_format, "Delete cancelled", None);
            }
            dashboard.delete_listing(request.confirm()).await?;
            output_success(
                &output_format,
                "Property deleted successfully",
                Some(json!({ "counts": dashboard.counts() })),
            )
        }
    }
}
