// netsec-core/src/application/contract.rs

use std::path::Path;

use tracing::debug;

use crate::domain::entity::Artifact;
use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::save_json;

/// Checks that every file the artifact names exists, then writes it as the
/// stage's `artifact.json`. Returns the artifact for handing downstream.
pub(crate) fn publish<A, E>(artifact: A, contract_path: &Path) -> Result<A, E>
where
    A: Artifact,
    E: From<DomainError> + From<InfrastructureError>,
{
    artifact.verify()?;
    save_json(contract_path, &artifact)?;
    debug!(stage = %A::STAGE, path = ?contract_path, "Artifact contract written");
    Ok(artifact)
}
