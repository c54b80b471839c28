pub mod admin;
pub mod auth;
pub mod contact;
pub mod nav;
pub mod owner;
pub mod properties;
