use clap::Subcommand;
use serde_json::json;

use crate::auth::SignUp;
use crate::cli::utils::{output_json, output_success, print_navigation, prompt};
use crate::cli::{CliSession, OutputFormat};
use crate::nav::Navigation;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Sign in with email and password")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Create an account")]
    Signup {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Full name")]
        name: String,
        #[arg(long, help = "Phone number")]
        phone: Option<String>,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Sign out and forget the saved session")]
    Logout,

    #[command(about = "Show the signed-in user and roles")]
    Status,

    #[command(about = "Refresh the saved session's tokens")]
    Refresh,
}

fn password_or_prompt(password: Option<String>) -> anyhow::Result<String> {
    match password {
        Some(password) => Ok(password),
        None => prompt("Password: "),
    }
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let session = CliSession::open().await?;

    match cmd {
        AuthCommands::Login { email, password } => {
            let password = password_or_prompt(password)?;
            let snapshot = session.context().sign_in(&email, &password).await?;
            session.persist(&snapshot)?;
            output_success(
                &output_format,
                "Logged in successfully",
                Some(json!({ "user": snapshot.state.identity, "roles": snapshot.state.roles })),
            )
        }
        AuthCommands::Signup {
            email,
            name,
            phone,
            password,
        } => {
            let request = SignUp {
                email,
                password: password_or_prompt(password)?,
                name,
                phone,
            };
            match session.context().sign_up(&request).await? {
                Some(snapshot) => {
                    session.persist(&snapshot)?;
                    output_success(
                        &output_format,
                        "Account created successfully",
                        Some(json!({ "user": snapshot.state.identity })),
                    )
                }
                None => output_success(
                    &output_format,
                    &format!("Check {} for a confirmation link", request.email),
                    None,
                ),
            }
        }
        AuthCommands::Logout => {
            let snapshot = session.context().sign_out().await;
            session.persist(&snapshot)?;
            output_success(&output_format, "Logged out successfully", None)
        }
        AuthCommands::Status => {
            let snapshot = session.context().current();
            match output_format {
                OutputFormat::Json => output_json(&snapshot),
                OutputFormat::Text => {
                    match &snapshot.state.identity {
                        Some(identity) => {
                            println!(
                                "User:  {} ({})",
                                identity.email.as_deref().unwrap_or("no email"),
                                identity.id
                            );
                            println!(
                                "Roles: tenant{}{}",
                                if snapshot.state.roles.owner { ", owner" } else { "" },
                                if snapshot.state.roles.admin { ", admin" } else { "" }
                            );
                        }
                        None => println!("Not signed in"),
                    }
                    print_navigation(&Navigation::for_state(&snapshot.state));
                    Ok(())
                }
            }
        }
        AuthCommands::Refresh => {
            // A failed refresh signs the context out; forget the file too.
            let result = session.context().refresh().await;
            session.persist(&session.context().current())?;
            let snapshot = result?;
            output_success(
                &output_format,
                "Session refreshed",
                Some(json!({ "expires_in": snapshot.session.map(|s| s.expires_in) })),
            )
        }
    }
}
