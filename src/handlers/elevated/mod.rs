// handlers/elevated/mod.rs - admin dashboard
//
// Security Level: admin role, checked in each handler before any fetch.

pub mod admin;
