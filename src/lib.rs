pub mod attachment;
pub mod auth;
pub mod cli;
pub mod config;
pub mod graph;
pub mod transaction;

pub use transaction::MailTransaction;
