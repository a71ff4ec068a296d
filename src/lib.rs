pub mod badge;
pub mod checklist;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod inventory;
pub mod models;
pub mod runner;
pub mod state;
pub mod store;
