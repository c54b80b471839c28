pub mod contact;
pub mod identity;
pub mod listing;
pub mod profile;
pub mod role;

pub use contact::{ContactMessage, NewContactMessage};
pub use identity::Identity;
pub use listing::{Category, Listing, ListingPatch, NewListing, OwnerContact};
pub use profile::Profile;
pub use role::{Role, RoleAssignment, RoleSet};
