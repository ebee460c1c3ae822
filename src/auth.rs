//! Auth-domain identifiers, secrets, and the identity record model.

pub mod id;
pub mod record;
pub mod secret;

pub use id::*;
pub use record::*;
pub use secret::*;
