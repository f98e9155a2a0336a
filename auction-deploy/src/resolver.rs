//! Picks the first candidate identifier that resolves to a compiled artifact.

use std::future::Future;
use tracing::debug;

use crate::artifacts::Artifact;
use crate::backend::DeploymentBackend;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct ResolvedArtifact {
    pub id: String,
    pub artifact: Artifact,
}

/// Runs `attempt` over `candidates` in order and stops at the first success.
///
/// On success returns the winning candidate with its value; when every attempt
/// fails returns each candidate paired with its failure, in order.
pub async fn first_success<'a, T, E, F, Fut>(
    candidates: &'a [String],
    mut attempt: F,
) -> std::result::Result<(&'a str, T), Vec<(&'a str, E)>>
where
    F: FnMut(&'a str) -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
{
    let mut failures = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match attempt(candidate.as_str()).await {
            Ok(value) => return Ok((candidate.as_str(), value)),
            Err(err) => failures.push((candidate.as_str(), err)),
        }
    }
    Err(failures)
}

pub async fn resolve_artifact<B>(backend: &B, contract: &str, candidates: &[String]) -> Result<ResolvedArtifact>
where
    B: DeploymentBackend + ?Sized,
{
    match first_success(candidates, |id| backend.get_artifact(id)).await {
        Ok((id, artifact)) => Ok(ResolvedArtifact {
            id: id.to_string(),
            artifact,
        }),
        Err(failures) => {
            let reasons = failures
                .iter()
                .map(|(id, err)| {
                    debug!("artifact candidate {} rejected: {}", id, err);
                    format!("{}: {}", id, err)
                })
                .collect();
            Err(Error::ArtifactNotFound {
                contract: contract.to_string(),
                candidates: candidates.to_vec(),
                reasons,
            })
        }
    }
}
