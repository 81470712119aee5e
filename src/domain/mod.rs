//! Domain layer - Core business logic and entities

pub mod error;
pub mod fingerprint;
pub mod key;
pub mod team;

pub use error::DomainError;
pub use fingerprint::Fingerprint;
pub use key::{KeyEntity, KeyIdentityResolver, KeyRingError, KeyRingParser, PublicKey};
pub use team::{
    validate_team_name, JoinRequest, Member, Membership, Team, TeamName, TeamStore,
    TeamStoreTransaction, TeamValidationError,
};
