use rand::RngCore;

/// Refresh tokens are 256 bits of CSPRNG output.
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate an opaque refresh token, hex-encoded.
/// Carries no expiry: it is valid until revoked.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
