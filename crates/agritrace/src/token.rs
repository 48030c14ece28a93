//! Sealed access tokens for back-office sessions.
//!
//! Claims are serialized to JSON, encrypted with AES-256-GCM and handed
//! out as one opaque hex string; verification unseals the payload and
//! enforces expiry. The sealing key resolves from multiple sources in
//! priority order:
//!
//! 1. **Direct value** - quick local testing (`key: "..."`)
//! 2. **File reference** - Docker secrets pattern (`key_file: /run/secrets/token_key`)
//! 3. **Env var reference** - Kubernetes/production (`key_env_var: AGRITRACE_TOKEN_KEY`)

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use chrono::{Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::config::{expand_tilde, TokenKeyConfig};

/// Default sealing key environment variable name.
pub const TOKEN_KEY_ENV_VAR: &str = "AGRITRACE_TOKEN_KEY";

/// Nonce size for AES-256-GCM (96 bits = 12 bytes).
const NONCE_SIZE: usize = 12;

/// Error type for token sealing failures.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("No token key source configured (need one of: key, key_file, or key_env_var)")]
    NoKeySource,

    #[error("Failed to read token key from file '{path}': {source}")]
    KeyFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Environment variable '{name}' not set")]
    EnvVarNotSet { name: String },

    #[error("Environment variable '{name}' contains invalid UTF-8")]
    EnvVarNotUnicode { name: String },

    #[error("Invalid token key: {0}")]
    InvalidKey(String),

    #[error("Failed to seal claims: {0}")]
    Seal(String),

    #[error("Failed to unseal token: {0}")]
    Unseal(String),

    #[error("Token has expired")]
    Expired,
}

/// What a minted token asserts about its holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account the token was issued to.
    pub subject: String,
    /// Back-office role, e.g. `admin` or `operator`.
    pub role: String,
    /// Unix timestamp (seconds) after which the token is rejected.
    pub expires_at: i64,
}

/// Token sealer using AES-256-GCM.
///
/// The key must be a 64-character hex string (32 bytes).
pub struct TokenSealer {
    cipher: Aes256Gcm,
}

impl TokenSealer {
    /// Creates a sealer from the `AGRITRACE_TOKEN_KEY` environment
    /// variable.
    pub fn from_env() -> Result<Self, TokenError> {
        let key_hex = std::env::var(TOKEN_KEY_ENV_VAR).map_err(|_| {
            TokenError::InvalidKey(format!("Environment variable {} not set", TOKEN_KEY_ENV_VAR))
        })?;

        Self::from_hex_key(&key_hex)
    }

    /// Creates a sealer from the configured key sources, in priority
    /// order: direct value, key file, environment variable.
    pub fn from_config(config: &TokenKeyConfig) -> Result<Self, TokenError> {
        let key = resolve_key(
            config.key.as_deref(),
            config.key_file.as_deref(),
            config.key_env_var.as_deref(),
        )?;
        Self::from_hex_key(key.expose_secret())
    }

    /// Creates a sealer from a hex-encoded key.
    ///
    /// # Arguments
    ///
    /// * `key_hex` - A 64-character hex string (32 bytes decoded)
    pub fn from_hex_key(key_hex: &str) -> Result<Self, TokenError> {
        let key_bytes = hex_decode(key_hex)
            .map_err(|e| TokenError::InvalidKey(format!("Invalid hex key: {}", e)))?;

        if key_bytes.len() != 32 {
            return Err(TokenError::InvalidKey(format!(
                "Key must be 32 bytes (64 hex chars), got {} bytes",
                key_bytes.len()
            )));
        }

        let cipher = Aes256Gcm::new_from_slice(&key_bytes)
            .map_err(|e| TokenError::InvalidKey(format!("Failed to create cipher: {}", e)))?;

        Ok(Self { cipher })
    }

    /// Mints a token for `subject` holding `role`, valid for `ttl`.
    pub fn mint(&self, subject: &str, role: &str, ttl: Duration) -> Result<String, TokenError> {
        let claims = Claims {
            subject: subject.to_string(),
            role: role.to_string(),
            expires_at: (Utc::now() + ttl).timestamp(),
        };
        let payload = serde_json::to_string(&claims)
            .map_err(|e| TokenError::Seal(format!("Failed to encode claims: {}", e)))?;

        self.seal(&payload)
    }

    /// Unseals a token and returns its claims if they have not expired.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let payload = self.unseal(token)?;
        let claims: Claims = serde_json::from_str(&payload)
            .map_err(|e| TokenError::Unseal(format!("Malformed claims payload: {}", e)))?;

        if claims.expires_at < Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    /// Encrypts a payload and returns hex-encoded ciphertext with
    /// prepended nonce.
    ///
    /// Format: `<12-byte nonce><ciphertext>` (all hex-encoded)
    fn seal(&self, payload: &str) -> Result<String, TokenError> {
        let nonce_bytes = rand_bytes::<NONCE_SIZE>()?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, payload.as_bytes())
            .map_err(|e| TokenError::Seal(e.to_string()))?;

        // Prepend nonce to ciphertext
        let mut combined = nonce_bytes.to_vec();
        combined.extend(ciphertext);

        Ok(hex_encode(&combined))
    }

    /// Decrypts a hex-encoded token (with prepended nonce) back into
    /// its payload.
    fn unseal(&self, token: &str) -> Result<String, TokenError> {
        let combined =
            hex_decode(token).map_err(|e| TokenError::Unseal(format!("Invalid hex: {}", e)))?;

        if combined.len() < NONCE_SIZE {
            return Err(TokenError::Unseal("Token too short".to_string()));
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let payload_bytes = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| TokenError::Unseal(e.to_string()))?;

        String::from_utf8(payload_bytes)
            .map_err(|e| TokenError::Unseal(format!("Invalid UTF-8: {}", e)))
    }
}

/// Resolves the sealing key from multiple sources in priority order:
/// 1. Direct value (if provided and non-empty)
/// 2. File contents (if path provided)
/// 3. Environment variable (if name provided)
fn resolve_key(
    direct: Option<&str>,
    file_path: Option<&str>,
    env_var: Option<&str>,
) -> Result<SecretString, TokenError> {
    // Priority 1: Direct value
    if let Some(value) = direct {
        if !value.is_empty() {
            return Ok(SecretString::from(value.to_string()));
        }
    }

    // Priority 2: File
    if let Some(path) = file_path {
        if !path.is_empty() {
            let expanded = expand_tilde(path);
            match fs::read_to_string(&expanded) {
                Ok(content) => return Ok(SecretString::from(content.trim().to_string())),
                Err(e) => {
                    return Err(TokenError::KeyFile {
                        path: expanded,
                        source: e,
                    })
                }
            }
        }
    }

    // Priority 3: Environment variable
    if let Some(var_name) = env_var {
        if !var_name.is_empty() {
            match std::env::var(var_name) {
                // Env vars may carry trailing newlines
                Ok(value) => return Ok(SecretString::from(value.trim().to_string())),
                Err(std::env::VarError::NotPresent) => {
                    return Err(TokenError::EnvVarNotSet {
                        name: var_name.to_string(),
                    })
                }
                Err(std::env::VarError::NotUnicode(_)) => {
                    return Err(TokenError::EnvVarNotUnicode {
                        name: var_name.to_string(),
                    })
                }
            }
        }
    }

    Err(TokenError::NoKeySource)
}

/// Encodes bytes as lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";
    let mut result = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        result.push(HEX_CHARS[(byte >> 4) as usize] as char);
        result.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
    }
    result
}

/// Decodes hex string to bytes.
fn hex_decode(hex: &str) -> Result<Vec<u8>, String> {
    if !hex.len().is_multiple_of(2) {
        return Err("Hex string must have even length".to_string());
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| format!("Invalid hex at position {}: {}", i, e))
        })
        .collect()
}

/// Generates random bytes using getrandom.
///
/// Returns an error if the system's random number generator fails.
fn rand_bytes<const N: usize>() -> Result<[u8; N], TokenError> {
    let mut bytes = [0u8; N];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| TokenError::Seal(format!("Failed to generate random bytes: {}", e)))?;
    Ok(bytes)
}
