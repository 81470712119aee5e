//! Key identity domain module
//!
//! A team member is identified by the fingerprint of the OpenPGP key they
//! submitted, never by a username or password.

mod parser;
mod public_key;
mod resolver;

pub use parser::{KeyEntity, KeyRingError, KeyRingParser};
pub use public_key::PublicKey;
pub use resolver::KeyIdentityResolver;
