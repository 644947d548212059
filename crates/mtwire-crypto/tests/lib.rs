use mtwire_crypto::{AuthKey, HeadroomBuffer, decrypt_data_v2, encrypt_data_v2};

fn get_test_auth_key() -> AuthKey {
    let mut buffer = [0u8; 256];
    buffer
        .iter_mut()
        .enumerate()
        .for_each(|(i, x)| *x = i as u8);

    AuthKey::from_bytes(buffer)
}

#[test]
fn encrypted_round_trip_recovers_plaintext() {
    let auth_key = get_test_auth_key();
    let plaintext = b"Hello, world! This data should remain secure!";

    let mut buffer = HeadroomBuffer::with_capacity(plaintext.len() + 32, 24);
    buffer.extend(plaintext.iter().copied());
    encrypt_data_v2(&mut buffer, &auth_key);

    // The server's reply reuses the same auth_key, just from the other side.
    let decrypted = decrypt_data_v2(buffer.as_ref(), &auth_key).unwrap();
    assert!(decrypted.starts_with(plaintext));
}

#[test]
fn decrypt_rejects_mismatched_auth_key() {
    let auth_key = get_test_auth_key();
    let mut other = [0u8; 256];
    other.iter_mut().enumerate().for_each(|(i, x)| *x = 255 - i as u8);
    let other_key = AuthKey::from_bytes(other);

    let mut buffer = HeadroomBuffer::with_capacity(64, 24);
    buffer.extend(std::iter::repeat(0u8).take(32));
    encrypt_data_v2(&mut buffer, &auth_key);

    assert!(decrypt_data_v2(buffer.as_ref(), &other_key).is_err());
}
