// handlers/public/mod.rs - reachable without signing in
//
// Anonymous callers read through the store's anonymous role; a signed-in
// caller's token is still forwarded so the navigation reflects their roles.

pub mod auth;
pub mod contact;
pub mod pages;
pub mod properties;
