// src/utils/pubkey_serde.rs
//! Serde helpers reading and writing addresses as base58 strings

use std::str::FromStr;

use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
use solana_program::pubkey::Pubkey;

/// Serialize a `Pubkey` as a base58 string
pub fn serialize<S>(pubkey: &Pubkey, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&pubkey.to_string())
}

/// Deserialize a `Pubkey` from a base58 string
pub fn deserialize<'de, D>(deserializer: D) -> Result<Pubkey, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded = String::deserialize(deserializer)?;
    Pubkey::from_str(&encoded).map_err(|e| D::Error::custom(format!("{}: {}", encoded, e)))
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use solana_program::pubkey::Pubkey;

    #[derive(Serialize, Deserialize)]
    struct Holder {
        #[serde(with = "super")]
        key: Pubkey,
    }

    #[test]
    fn test_base58_round_trip() {
        let key = Pubkey::new_unique();
        let json = serde_json::to_string(&Holder { key }).unwrap();
        assert!(json.contains(&key.to_string()));

        let parsed: Holder = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.key, key);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Holder>(r#"{"key": "not-a-key"}"#).is_err());
    }
}
