use claimvault_crypto::{
    CryptoError, RotatableSymmetricClaimDecryptor, SymmetricClaimDecryptor,
    SymmetricClaimEncryptor, SymmetricKey, SymmetricKeyRotator,
};
use serde_json::json;

fn sample_claim() -> serde_json::Value {
    json!({
        "id": "123-abc",
        "foo": "something-really-private-and-sensitive",
    })
}

#[test]
fn rotated_envelope_decrypts_under_new_key() {
    let old_key = SymmetricKey::generate();
    let new_key = SymmetricKey::generate();
    let claim = sample_claim();

    let packaged = SymmetricClaimEncryptor::new(claim.clone(), old_key.clone())
        .unwrap()
        .packaged_claim()
        .unwrap();

    let rotator = SymmetricKeyRotator::new(old_key, new_key.clone());
    let repackaged = rotator.rotate(&packaged).unwrap();
    assert_ne!(repackaged, packaged);
    assert_eq!(repackaged.claim_id, packaged.claim_id);

    let decrypted = SymmetricClaimDecryptor::new(&repackaged.as_json().unwrap(), new_key)
        .unwrap()
        .decrypt()
        .unwrap();
    assert_eq!(decrypted, claim);
}

#[test]
fn rotation_with_identical_keys_still_changes_envelope() {
    let key = SymmetricKey::generate();
    let packaged = SymmetricClaimEncryptor::new(sample_claim(), key.clone())
        .unwrap()
        .packaged_claim()
        .unwrap();

    let rotator = SymmetricKeyRotator::new(key.clone(), key.clone());
    let repackaged = rotator.rotate(&packaged).unwrap();
    assert_ne!(repackaged, packaged);

    let decrypted = SymmetricClaimDecryptor::new(&repackaged.as_json().unwrap(), key)
        .unwrap()
        .decrypt()
        .unwrap();
    assert_eq!(decrypted, sample_claim());
}

#[test]
fn rotation_fails_when_old_key_does_not_match() {
    let key = SymmetricKey::generate();
    let packaged = SymmetricClaimEncryptor::new(sample_claim(), key)
        .unwrap()
        .packaged_claim()
        .unwrap();

    let rotator = SymmetricKeyRotator::new(SymmetricKey::generate(), SymmetricKey::generate());
    let result = rotator.rotate(&packaged);
    assert!(matches!(result, Err(CryptoError::Decryption(_))));
}

#[test]
fn multi_key_decryptor_finds_the_matching_key() {
    let keys = vec![SymmetricKey::generate(), SymmetricKey::generate()];
    let claim = sample_claim();

    // encrypted under the second (newest-but-one) key in the list
    let packaged = SymmetricClaimEncryptor::new(claim.clone(), keys[1].clone())
        .unwrap()
        .packaged_claim()
        .unwrap();

    let decryptor =
        RotatableSymmetricClaimDecryptor::new(&packaged.as_json().unwrap(), keys).unwrap();
    assert_eq!(decryptor.decrypt().unwrap(), claim);
}

#[test]
fn multi_key_decryptor_reports_one_aggregate_failure() {
    let key = SymmetricKey::generate();
    let packaged = SymmetricClaimEncryptor::new(sample_claim(), key)
        .unwrap()
        .packaged_claim()
        .unwrap();

    let candidates = vec![SymmetricKey::generate(), SymmetricKey::generate()];
    let decryptor =
        RotatableSymmetricClaimDecryptor::new(&packaged.as_json().unwrap(), candidates).unwrap();

    let result = decryptor.decrypt();
    assert!(matches!(result, Err(CryptoError::NoUsableKey { tried: 2 })));
}

#[test]
fn empty_key_list_fails_cleanly() {
    let key = SymmetricKey::generate();
    let packaged = SymmetricClaimEncryptor::new(sample_claim(), key)
        .unwrap()
        .packaged_claim()
        .unwrap();

    let decryptor =
        RotatableSymmetricClaimDecryptor::new(&packaged.as_json().unwrap(), Vec::new()).unwrap();
    assert!(matches!(
        decryptor.decrypt(),
        Err(CryptoError::NoUsableKey { tried: 0 })
    ));
}
