//! Cryptographic Utilities
//!
//! Random keys, HMAC-SHA256, Base64 and the signed opaque tokens
//! carried in session cookies.

use base64::{Engine, engine::general_purpose};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// Separator between payload and signature in a signed token
const TOKEN_SEPARATOR: char = '.';

/// Generate a random 256-bit key
pub fn random_key() -> [u8; 32] {
    let mut key = [0u8; 32];
    OsRng.fill_bytes(&mut key);
    key
}

/// Encode bytes as base64
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode base64 to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// Decode a base64 string into a 32-byte key
pub fn key_from_base64(s: &str) -> Option<[u8; 32]> {
    from_base64(s.trim()).ok()?.try_into().ok()
}

/// Compute HMAC-SHA256
pub fn hmac_sha256(key: &[u8; 32], data: &[u8]) -> [u8; 32] {
    // HMAC: H((K XOR opad) || H((K XOR ipad) || message))
    let mut o_key_pad = [0x5cu8; 64];
    let mut i_key_pad = [0x36u8; 64];

    for i in 0..32 {
        o_key_pad[i] ^= key[i];
        i_key_pad[i] ^= key[i];
    }

    let mut inner_hash = Sha256::new();
    inner_hash.update(i_key_pad);
    inner_hash.update(data);
    let inner_result = inner_hash.finalize();

    let mut outer_hash = Sha256::new();
    outer_hash.update(o_key_pad);
    outer_hash.update(inner_result);
    outer_hash.finalize().into()
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Sign `payload` into a cookie-safe token: `base64url(payload).base64url(mac)`
pub fn sign_token(key: &[u8; 32], payload: &[u8]) -> String {
    let mac = hmac_sha256(key, payload);
    format!(
        "{}{}{}",
        general_purpose::URL_SAFE_NO_PAD.encode(payload),
        TOKEN_SEPARATOR,
        general_purpose::URL_SAFE_NO_PAD.encode(mac)
    )
}

/// Verify a token produced by [`sign_token`] and return its payload.
///
/// Returns `None` for malformed tokens and signature mismatches alike.
pub fn verify_token(key: &[u8; 32], token: &str) -> Option<Vec<u8>> {
    let (payload_b64, mac_b64) = token.split_once(TOKEN_SEPARATOR)?;
    let payload = general_purpose::URL_SAFE_NO_PAD.decode(payload_b64).ok()?;
    let mac = general_purpose::URL_SAFE_NO_PAD.decode(mac_b64).ok()?;

    let expected = hmac_sha256(key, &payload);
    constant_time_eq(&expected, &mac).then_some(payload)
}
