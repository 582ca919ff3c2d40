use rand::RngCore;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

const KEY_BYTES: usize = 32;

/// Generates a device API key: 32 bytes from the OS CSPRNG, base64
/// URL-safe encoded. Immutable for the lifetime of the device; the
/// unique index on devices.api_key backstops collisions.
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; KEY_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
