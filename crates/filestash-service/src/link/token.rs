//! Link token generation.

use rand::TryRngCore;
use rand::rngs::OsRng;

use filestash_core::error::{AppError, ErrorKind};
use filestash_entity::link::LinkId;

/// Entropy per token.
pub const TOKEN_BYTES: usize = 32;

/// Draws a fresh token from the operating system's CSPRNG, hex encoded.
pub fn generate_token() -> Result<LinkId, AppError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
        AppError::with_source(ErrorKind::Internal, "OS random source unavailable", e)
    })?;
    Ok(LinkId::new(hex::encode(&bytes)))
}

mod hex {
    use std::fmt::Write;

    /// Lowercase hex without an external dependency.
    pub fn encode(bytes: &[u8]) -> String {
        bytes
            .iter()
            .fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
                let _ = write!(out, "{b:02x}");
                out
            })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_token().expect("token");
        assert_eq!(token.as_str().len(), TOKEN_BYTES * 2);
        assert!(token.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_tokens_do_not_repeat() {
        let tokens: HashSet<String> = (0..1000)
            .map(|_| generate_token().expect("token").to_string())
            .collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_hex_encode() {
        assert_eq!(hex::encode(&[0x00, 0x0f, 0xa5, 0xff]), "000fa5ff");
    }
}
