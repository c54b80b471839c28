use crate::cli::utils::{output_json, print_navigation};
use crate::cli::{CliSession, OutputFormat};
use crate::nav::Navigation;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let session = CliSession::open().await?;
    let nav = Navigation::for_state(&session.state());

    match output_format {
        OutputFormat::Json => output_json(&nav),
        OutputFormat::Text => {
            print_navigation(&nav);
            Ok(())
        }
    }
}
