//! API key material
//!
//! Keys look like `zt_live_sk_<26 alphanumerics>`. The suffix comes from the
//! thread-local CSPRNG; nothing checks for collisions.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::str::FromStr;

/// Length of the random part of a key
pub const KEY_SUFFIX_LEN: usize = 26;

const MASK_HEAD: usize = 12;
const MASK_TAIL: usize = 4;
const MASK_FILL: usize = 20;

/// Environment tag carried in the key prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyEnvironment {
    Live,
    Test,
}

impl KeyEnvironment {
    pub fn prefix(&self) -> &'static str {
        match self {
            KeyEnvironment::Live => "zt_live_sk_",
            KeyEnvironment::Test => "zt_test_sk_",
        }
    }
}

impl FromStr for KeyEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(KeyEnvironment::Live),
            "test" => Ok(KeyEnvironment::Test),
            other => Err(format!("Unknown key environment '{}' (expected live or test)", other)),
        }
    }
}

/// Generate a fresh key string for the given environment
pub fn generate_key(environment: KeyEnvironment) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(KEY_SUFFIX_LEN)
        .map(char::from)
        .collect();

    format!("{}{}", environment.prefix(), suffix)
}

/// Hide the middle of a key, keeping its head and tail recognizable
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= MASK_HEAD + MASK_TAIL {
        return "•".repeat(MASK_FILL);
    }

    let head: String = chars[..MASK_HEAD].iter().collect();
    let tail: String = chars[chars.len() - MASK_TAIL..].iter().collect();
    format!("{}{}{}", head, "•".repeat(MASK_FILL), tail)
}

/// Short SHA-256 fingerprint, safe to write to logs
pub fn fingerprint(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{:x}", digest)[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generated_key_shape() {
        let key = generate_key(KeyEnvironment::Live);
        assert!(key.starts_with("zt_live_sk_"));
        assert_eq!(key.len(), "zt_live_sk_".len() + KEY_SUFFIX_LEN);
        assert!(key["zt_live_sk_".len()..].chars().all(|c| c.is_ascii_alphanumeric()));

        let test_key = generate_key(KeyEnvironment::Test);
        assert!(test_key.starts_with("zt_test_sk_"));
        assert_ne!(key, test_key);
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(
            mask_key("zt_live_sk_1a2b3c4d5e6f7g8h9i0j"),
            format!("zt_live_sk_1{}9i0j", "•".repeat(20))
        );
        assert_eq!(mask_key("short"), "•".repeat(20));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = fingerprint("zt_live_sk_abc");
        assert_eq!(a.len(), 16);
        assert_eq!(a, fingerprint("zt_live_sk_abc"));
        assert_ne!(a, fingerprint("zt_live_sk_abd"));
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!("TEST".parse::<KeyEnvironment>(), Ok(KeyEnvironment::Test));
        assert!("staging".parse::<KeyEnvironment>().is_err());
    }
}
