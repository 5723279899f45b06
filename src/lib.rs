//! Invite Forge - invite code generation and existence checking
//!
//! Generates random candidate codes and tests each one against a lookup
//! endpoint, cycling through proxy transports and backing off from rate limits.

pub mod brute;
pub mod codes;
pub mod error;
pub mod output;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use error::{InviteForgeError, Result};
pub use types::{BruteConfig, Guild, Invite, Inviter, ProxySelection};

// Re-export main functionality
pub use brute::{BatchOutcome, InviteBrute, InviteLookup};
pub use codes::CodeGenerator;
pub use transport::{build_transports, TransportHandle};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
