//! tidy - MongoDB storage and command line for the TIDY chore ledger
//!
//! ## Components
//!
//! - **db**: MongoDB client, typed collections and document schemas
//! - **store**: `MongoLedgerStore`, the production `LedgerStore`
//! - **config** / **commands**: CLI arguments and command dispatch

pub mod commands;
pub mod config;
pub mod db;
pub mod store;

pub use store::MongoLedgerStore;
