mod auth;
mod trace;

pub use auth::*;
pub use trace::*;
