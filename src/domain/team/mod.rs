//! Team domain module
//!
//! Teams are created together with their founding administrator and are
//! addressed externally only by UUID.

mod entity;
mod repository;
mod validation;

pub use entity::{JoinRequest, Member, Membership, Team, TeamName};
pub use repository::{TeamStore, TeamStoreTransaction};
pub use validation::{validate_team_name, TeamValidationError};
