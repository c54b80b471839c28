//! Public contact form.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::listing::FormError;
use crate::models::NewContactMessage;
use crate::store::Repository;

pub const SEND_FAILED: &str = "Failed to send message";

const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 255;
const MESSAGE_MAX: usize = 1000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

fn invalid(field: &'static str, message: impl Into<String>) -> FormError {
    FormError::Validation {
        field,
        message: message.into(),
    }
}

fn is_email(value: &str) -> bool {
    let mut parts = value.split('@');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
    )
}

impl ContactDraft {
    pub fn validate(&self) -> Result<NewContactMessage, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(invalid("name", "Name is required"));
        }
        if name.chars().count() > NAME_MAX {
            return Err(invalid("name", format!("Name must be at most {} characters", NAME_MAX)));
        }

        let email = self.email.trim();
        if !is_email(email) {
            return Err(invalid("email", "Invalid email address"));
        }
        if email.chars().count() > EMAIL_MAX {
            return Err(invalid("email", format!("Email must be at most {} characters", EMAIL_MAX)));
        }

        let message = self.message.trim();
        if message.is_empty() {
            return Err(invalid("message", "Message is required"));
        }
        if message.chars().count() > MESSAGE_MAX {
            return Err(invalid(
                "message",
                format!("Message must be at most {} characters", MESSAGE_MAX),
            ));
        }

        Ok(NewContactMessage {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        })
    }

    /// Validates and stores the message. Returns what was stored.
    pub async fn submit(&self, repo: &Repository) -> Result<NewContactMessage, FormError> {
        let message = self.validate()?;
        match repo.insert_contact(&message).await {
            Ok(()) => {
                info!("Stored contact message from {}", message.email);
                Ok(message)
            }
            Err(e) => {
                error!("Storing contact message failed: {}", e);
                Err(FormError::Remote(SEND_FAILED))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Collection, MemoryStore};
    use std::sync::Arc;

    fn draft() -> ContactDraft {
        ContactDraft {
            name: "Tara".to_string(),
            email: "tara@example.com".to_string(),
            message: "Is the flat still free?".to_string(),
        }
    }

    #[test]
    fn email_needs_exactly_one_at_with_both_sides() {
        assert!(is_email("a@b"));
        assert!(!is_email("ab"));
        assert!(!is_email("@b"));
        assert!(!is_email("a@"));
        assert!(!is_email("a@b@c"));
    }

    #[test]
    fn long_message_is_rejected() {
        let mut d = draft();
        d.message = "m".repeat(1001);
        assert!(matches!(
            d.validate(),
            Err(FormError::Validation { field: "message", .. })
        ));
    }

    #[tokio::test]
    async fn submit_stores_message() {
        let store = MemoryStore::new();
        let saved = draft()
            .submit(&Repository::new(Arc::new(store.clone())))
            .await
            .unwrap();
        assert_eq!(saved.name, "Tara");
        assert_eq!(store.rows(Collection::Contacts).await.len(), 1);
    }

    #[tokio::test]
    async fn store_failure_has_generic_notice() {
        let store = MemoryStore::new();
        store.fail(Collection::Contacts).await;
        let err = draft()
            .submit(&Repository::new(Arc::new(store)))
            .await
            .unwrap_err();
        assert_eq!(err, FormError::Remote(SEND_FAILED));
    }
}
