use alloy::primitives::Address;

use crate::backend::DeploymentBackend;
use crate::{Error, Result};

/// Pending transaction count of the first available signer.
pub async fn current_nonce<B>(backend: &B) -> Result<(Address, u64)>
where
    B: DeploymentBackend + ?Sized,
{
    let signer = backend
        .signers()
        .await?
        .into_iter()
        .next()
        .ok_or(Error::NoSigner)?;
    let nonce = backend.transaction_count(signer).await?;
    Ok((signer, nonce))
}
