// handlers/protected/mod.rs - owner dashboard
//
// Security Level: owner role, checked in each handler before any fetch.
// Writes are forwarded with the owner's token; the store's policies decide
// whether they land.

pub mod owner;
