//! Demo data for `BACKEND_MODE=memory`.

use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::MemoryAuth;
use crate::models::{Category, Identity};
use crate::store::{Collection, MemoryStore};

pub const OWNER_EMAIL: &str = "owner@rentease.test";
pub const ADMIN_EMAIL: &str = "admin@rentease.test";
pub const TENANT_EMAIL: &str = "tenant@rentease.test";
pub const DEMO_PASSWORD: &str = "rentease-demo";

// Fixed so tokens saved by one process still name the same account in the next.
const OWNER_ID: Uuid = Uuid::from_u128(0x5d1c_0a4e_7f3b_4c2a_9e61_0000_0000_0001);
const ADMIN_ID: Uuid = Uuid::from_u128(0x5d1c_0a4e_7f3b_4c2a_9e61_0000_0000_0002);
const TENANT_ID: Uuid = Uuid::from_u128(0x5d1c_0a4e_7f3b_4c2a_9e61_0000_0000_0003);

struct DemoListing {
    title: &'static str,
    location: &'static str,
    rent: &'static str,
    category: Category,
    description: &'static str,
    available: bool,
}

const LISTINGS: [DemoListing; 4] = [
    DemoListing {
        title: "Sunny 2BHK near Koregaon Park",
        location: "Pune",
        rent: "18500",
        category: Category::Flat,
        description: "Second floor flat with balcony, covered parking and 24h water.",
        available: true,
    },
    DemoListing {
        title: "Girls PG with meals",
        location: "Bengaluru, Koramangala",
        rent: "9000",
        category: Category::Pg,
        description: "Twin sharing, three meals a day, Wi-Fi and laundry included.",
        available: true,
    },
    DemoListing {
        title: "Single room close to metro",
        location: "Delhi, Rajouri Garden",
        rent: "7500",
        category: Category::Room,
        description: "Furnished room with attached bathroom, five minutes from the station.",
        available: true,
    },
    DemoListing {
        title: "Studio flat, currently let",
        location: "Mumbai, Andheri West",
        rent: "24000",
        category: Category::Flat,
        description: "Compact studio with kitchenette. Available again next quarter.",
        available: false,
    },
];

/// Registers the demo owner, admin and tenant and fills every collection.
pub async fn seed(auth: &MemoryAuth, store: &MemoryStore) -> anyhow::Result<()> {
    let owner = auth.register_as(OWNER_ID, OWNER_EMAIL, DEMO_PASSWORD);
    let admin = auth.register_as(ADMIN_ID, ADMIN_EMAIL, DEMO_PASSWORD);
    let tenant = auth.register_as(TENANT_ID, TENANT_EMAIL, DEMO_PASSWORD);
    let now = Utc::now();

    store
        .seed(
            Collection::Profiles,
            vec![
                profile(&owner, "Asha Owner", Some("+91 98200 00001"), now),
                profile(&admin, "Ravi Admin", None, now),
                profile(&tenant, "Tara Tenant", Some("+91 98200 00003"), now),
            ],
        )
        .await;

    store
        .seed(
            Collection::UserRoles,
            vec![
                role(&owner, "owner"),
                role(&admin, "admin"),
                role(&admin, "owner"),
                role(&tenant, "tenant"),
            ],
        )
        .await;

    let listings = LISTINGS
        .iter()
        .enumerate()
        .map(|(age, listing)| {
            json!({
                "id": Uuid::new_v4().to_string(),
                "title": listing.title,
                "location": listing.location,
                "rent": listing.rent,
                "type": listing.category.as_str(),
                "description": listing.description,
                "is_available": listing.available,
                "image_url": null,
                "owner_id": owner.id.to_string(),
                "created_at": (now - Duration::days(age as i64)).to_rfc3339(),
            })
        })
        .collect();
    store.seed(Collection::Properties, listings).await;

    store
        .seed(
            Collection::Contacts,
            vec![json!({
                "id": Uuid::new_v4().to_string(),
                "name": "Tara Tenant",
                "email": TENANT_EMAIL,
                "message": "Is the Pune flat pet friendly?",
                "created_at": (now - Duration::hours(5)).to_rfc3339(),
            })],
        )
        .await;

    info!(
        "Seeded demo accounts {}, {} and {}",
        OWNER_EMAIL, ADMIN_EMAIL, TENANT_EMAIL
    );
    Ok(())
}

fn profile(identity: &Identity, name: &str, phone: Option<&str>, at: chrono::DateTime<Utc>) -> Value {
    json!({
        "id": identity.id.to_string(),
        "name": name,
        "email": identity.email,
        "phone": phone,
        "created_at": at.to_rfc3339(),
    })
}

fn role(identity: &Identity, role: &str) -> Value {
    json!({ "user_id": identity.id.to_string(), "role": role })
}
