//! Account lifecycle, client configuration, and diagnostic logging.

pub mod account;
pub mod config;
pub mod logger;
