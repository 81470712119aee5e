//! Team infrastructure implementations

mod in_memory;
mod postgres;
mod service;

pub use in_memory::InMemoryTeamStore;
pub use postgres::PostgresTeamStore;
pub use service::{TeamService, DEFAULT_WORKFLOW_TIMEOUT};
