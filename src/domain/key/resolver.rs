//! Key identity resolution

use std::sync::Arc;

use tracing::debug;

use super::parser::KeyRingParser;
use crate::domain::fingerprint::Fingerprint;
use crate::domain::DomainError;

/// Turns submitted key text into the fingerprint that identifies its holder.
///
/// Has no side effects, so workflows call it before opening a transaction.
#[derive(Debug, Clone)]
pub struct KeyIdentityResolver {
    parser: Arc<dyn KeyRingParser>,
}

impl KeyIdentityResolver {
    pub fn new(parser: Arc<dyn KeyRingParser>) -> Self {
        Self { parser }
    }

    /// Resolve the single identity described by `armored`
    pub fn resolve(&self, armored: &str) -> Result<Fingerprint, DomainError> {
        let entities = self
            .parser
            .parse_key_ring(armored)
            .map_err(|e| DomainError::key_parse(e.to_string()))?;

        let [entity] = entities.as_slice() else {
            return Err(DomainError::identity_count(entities.len()));
        };

        let fingerprint = Fingerprint::from_bytes(&entity.primary_fingerprint);
        debug!(
            fingerprint = %fingerprint,
            user_ids = ?entity.user_ids,
            "Resolved key identity"
        );

        Ok(fingerprint)
    }
}
