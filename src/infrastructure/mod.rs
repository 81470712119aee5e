//! Infrastructure layer - Key parsing, storage backends and workflows

pub mod logging;
pub mod openpgp;
pub mod storage;
pub mod team;
