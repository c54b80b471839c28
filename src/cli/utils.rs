use serde::Serialize;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};

use crate::cli::OutputFormat;
use crate::models::Listing;
use crate::nav::{Navigation, SessionControls};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a notice (a degraded view, a denial) in the appropriate format
pub fn output_notice(output_format: &OutputFormat, notice: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "notice": notice }))?);
        }
        OutputFormat::Text => {
            eprintln!("! {}", notice);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

pub fn output_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One line per listing: id, type, rent, location, title.
pub fn print_listings(listings: &[Listing]) {
    for listing in listings {
        let availability = if listing.is_available { "" } else { " (unavailable)" };
        let owner = listing
            .owner
            .as_ref()
            .map(|owner| format!(" [{}]", owner.name))
            .unwrap_or_default();
        println!(
            "{}  {:<4} ₹{:>8}/mo  {:<24}  {}{}{}",
            listing.id,
            listing.category.as_str(),
            listing.rent,
            listing.location,
            listing.title,
            availability,
            owner
        );
    }
}

pub fn print_listing_detail(listing: &Listing) {
    println!("{}", listing.title);
    println!("  Type:      {}", listing.category);
    println!("  Location:  {}", listing.location);
    println!("  Rent:      ₹{}/month", listing.rent);
    println!("  Available: {}", if listing.is_available { "yes" } else { "no" });
    println!("  Listed:    {}", listing.created_at.format("%Y-%m-%d"));
    println!();
    println!("{}", listing.description);
    if let Some(owner) = &listing.owner {
        println!();
        println!("Contact {}", owner.name);
        if let Some(email) = &owner.email {
            println!("  Email: {}", email);
        }
        if let Some(phone) = &owner.phone {
            println!("  Phone: {}", phone);
        }
    }
}

pub fn print_navigation(nav: &Navigation) {
    for link in &nav.links {
        println!("  {:<12} {}", link.label, link.href);
    }
    match &nav.session {
        SessionControls::SignedIn { email, logout } => {
            println!(
                "Signed in as {}. {}: rentease auth logout",
                email.as_deref().unwrap_or("unknown"),
                logout.label
            );
        }
        SessionControls::SignedOut { login, sign_up } => {
            println!(
                "Not signed in. {}: rentease auth login | {}: rentease auth signup",
                login.label, sign_up.label
            );
        }
    }
}

/// Reads one trimmed line from stdin after printing `prompt` to stderr.
pub fn prompt(prompt: &str) -> anyhow::Result<String> {
    eprint!("{}", prompt);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Asks a yes/no question; anything but y/yes is no.
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    let answer = prompt(&format!("{} [y/N] ", question))?;
    Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
}
