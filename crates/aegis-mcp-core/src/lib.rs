mod claims;
mod config;
mod errors;
mod general;
mod mcp;
mod oauth;

pub use claims::*;
pub use config::*;
pub use errors::*;
pub use general::*;
pub use mcp::*;
pub use oauth::*;
