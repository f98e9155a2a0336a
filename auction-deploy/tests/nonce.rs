use alloy::primitives::Address;
use auction_deploy::backend::InMemoryBackend;
use auction_deploy::nonce::current_nonce;
use auction_deploy::Error;

#[tokio::test]
async fn test_nonce_of_first_signer() {
    let first = Address::with_last_byte(1);
    let second = Address::with_last_byte(2);
    let backend = InMemoryBackend::new("localhost")
        .with_account(first)
        .with_account(second)
        .with_nonce(first, 7)
        .with_nonce(second, 99);

    let (signer, nonce) = current_nonce(&backend).await.unwrap();

    assert_eq!(signer, first);
    assert_eq!(nonce, 7);
}

#[tokio::test]
async fn test_fresh_signer_has_zero_nonce() {
    let backend = InMemoryBackend::new("localhost").with_account(Address::with_last_byte(3));
    assert_eq!(current_nonce(&backend).await.unwrap().1, 0);
}

#[tokio::test]
async fn test_no_signer() {
    let backend = InMemoryBackend::new("localhost");
    assert!(matches!(current_nonce(&backend).await, Err(Error::NoSigner)));
}
