pub mod app;
pub mod auth;
pub mod backend;
pub mod cli;
pub mod config;
pub mod contact;
pub mod dashboard;
pub mod demo;
pub mod error;
pub mod handlers;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod nav;
pub mod session;
pub mod store;

pub use app::{app, AppState};
