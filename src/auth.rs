//! Credential holder: validated site code, redacted API key, and deferred loading.

pub mod credentials;
pub mod id;
pub mod secret;

pub use credentials::*;
pub use id::*;
pub use secret::*;
