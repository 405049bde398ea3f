//! # Domo Core
//!
//! Account lifecycle operations against the Domo accounts API.
//!
//! ## Layout
//!
//! ```text
//! domo-core/src/
//! ├── transport/        # Transport trait, reqwest implementation, envelopes
//! ├── auth.rs           # AuthProvider trait + developer-token auth
//! ├── modules/
//! │   ├── account/      # Route functions (one HTTP call each)
//! │   ├── account.rs    # AccountManager: create / read / update / delete
//! │   ├── config.rs     # ClientConfig (env or JSON file)
//! │   └── logger.rs     # Breadcrumb logger with call-chain capture
//! └── utils/stack.rs    # Backtrace parsing and trimming
//! ```
//!
//! Config variants and the registry that resolves them live in `domo-types`.

#![allow(
    clippy::significant_drop_tightening,
    reason = "Logger state guard is held while the entry is built from it"
)]
// Test-only lints: tests panic on unexpected variants and assert on join results
#![cfg_attr(test, allow(clippy::panic, clippy::assertions_on_result_states))]

pub mod auth;
pub mod error;
pub mod modules;
pub mod transport;
pub mod utils;

// Re-export commonly used types
pub use auth::{AuthHeader, AuthProvider, TokenAuth};
pub use error::{AppError, AppResult};
pub use modules::account::AccountManager;
pub use modules::config::ClientConfig;
pub use modules::logger::{init_tracing, LogContext, Logger};
pub use transport::{HttpTransport, ResponseEnvelope, Transport};
