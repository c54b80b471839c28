use clap::Args;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::{CliSession, OutputFormat};
use crate::contact::ContactDraft;

#[derive(Args)]
pub struct ContactArgs {
    #[arg(long, help = "Your name")]
    pub name: String,
    #[arg(long, help = "Your email address")]
    pub email: String,
    #[arg(long, help = "Message text")]
    pub message: String,
}

pub async fn handle(args: ContactArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = CliSession::open().await?;
    let draft = ContactDraft {
        name: args.name,
        email: args.email,
        message: args.message,
    };

    let sent = draft.submit(&session.repository()).await?;
    output_success(
        &output_format,
        "Message sent successfully",
        Some(json!({ "message": sent })),
    )
}
