//! Minimal ABI codec for read-only registry calls.
//!
//! The registry surface is two view functions with static-width arguments
//! and returns, so a full ABI library is not needed: calldata is a 4-byte
//! keccak selector plus zero-padded 32-byte words, and returndata is a
//! sequence of 32-byte words.

use tiny_keccak::{Hasher, Keccak};

use crowdmint_shared::{CrowdMintError, Result};

/// Width of one ABI word.
pub const WORD_BYTES: usize = 32;

/// First 4 bytes of the keccak-256 hash of a canonical function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let mut keccak = Keccak::v256();
    let mut output = [0u8; 32];
    keccak.update(signature.as_bytes());
    keccak.finalize(&mut output);
    [output[0], output[1], output[2], output[3]]
}

/// Encode a call to `signature` with uint256 arguments as 0x-prefixed hex
/// calldata.
pub fn encode_call(signature: &str, args: &[u128]) -> String {
    let mut data = Vec::with_capacity(4 + args.len() * WORD_BYTES);
    data.extend_from_slice(&selector(signature));
    for arg in args {
        let mut word = [0u8; WORD_BYTES];
        word[WORD_BYTES - 16..].copy_from_slice(&arg.to_be_bytes());
        data.extend_from_slice(&word);
    }
    format!("0x{}", hex::encode(data))
}

/// Split 0x-prefixed hex returndata into 32-byte words.
pub fn decode_words(data: &str) -> Result<Vec<[u8; WORD_BYTES]>> {
    let stripped = data.strip_prefix("0x").unwrap_or(data);
    let bytes = hex::decode(stripped)
        .map_err(|e| CrowdMintError::decode(format!("invalid hex returndata: {e}")))?;

    if bytes.len() % WORD_BYTES != 0 {
        return Err(CrowdMintError::decode(format!(
            "returndata length {} is not word-aligned",
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(WORD_BYTES)
        .map(|chunk| {
            let mut word = [0u8; WORD_BYTES];
            word.copy_from_slice(chunk);
            word
        })
        .collect())
}

/// Decode a uint256 word into a u64, failing on overflow rather than
/// truncating.
pub fn word_to_u64(word: &[u8; WORD_BYTES]) -> Result<u64> {
    if word[..WORD_BYTES - 8].iter().any(|b| *b != 0) {
        return Err(CrowdMintError::decode("uint256 value exceeds u64 range"));
    }
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&word[WORD_BYTES - 8..]);
    Ok(u64::from_be_bytes(tail))
}

/// Decode a uint256 word into a u128 (wide enough for any wei amount),
/// failing on overflow rather than truncating.
pub fn word_to_u128(word: &[u8; WORD_BYTES]) -> Result<u128> {
    if word[..WORD_BYTES - 16].iter().any(|b| *b != 0) {
        return Err(CrowdMintError::decode("uint256 value exceeds u128 range"));
    }
    let mut tail = [0u8; 16];
    tail.copy_from_slice(&word[WORD_BYTES - 16..]);
    Ok(u128::from_be_bytes(tail))
}

/// Decode an address word into a 0x-prefixed lowercase hex string.
pub fn word_to_address(word: &[u8; WORD_BYTES]) -> Result<String> {
    if word[..WORD_BYTES - 20].iter().any(|b| *b != 0) {
        return Err(CrowdMintError::decode("address word has nonzero padding"));
    }
    Ok(format!("0x{}", hex::encode(&word[WORD_BYTES - 20..])))
}

/// Decode a bool word (0 or 1 in the last byte).
pub fn word_to_bool(word: &[u8; WORD_BYTES]) -> Result<bool> {
    if word[..WORD_BYTES - 1].iter().any(|b| *b != 0) {
        return Err(CrowdMintError::decode("bool word has nonzero padding"));
    }
    match word[WORD_BYTES - 1] {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(CrowdMintError::decode(format!(
            "bool word has invalid value {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known ERC-20 selectors serve as reference vectors.
    #[test]
    fn selector_matches_known_vectors() {
        assert_eq!(hex::encode(selector("transfer(address,uint256)")), "a9059cbb");
        assert_eq!(hex::encode(selector("balanceOf(address)")), "70a08231");
        assert_eq!(hex::encode(selector("totalSupply()")), "18160ddd");
    }

    #[test]
    fn encode_call_pads_arguments() {
        let calldata = encode_call("balanceOf(address)", &[7]);
        // 0x + 4-byte selector + one 32-byte word
        assert_eq!(calldata.len(), 2 + 8 + 64);
        assert!(calldata.starts_with("0x70a08231"));
        assert!(calldata.ends_with("07"));
    }

    #[test]
    fn decode_words_splits_returndata() {
        let data = format!("0x{}{}", "00".repeat(31) + "05", "00".repeat(31) + "01");
        let words = decode_words(&data).expect("decode");
        assert_eq!(words.len(), 2);
        assert_eq!(word_to_u64(&words[0]).unwrap(), 5);
        assert!(word_to_bool(&words[1]).unwrap());
    }

    #[test]
    fn decode_words_rejects_misaligned_data() {
        let err = decode_words("0xabcdef").unwrap_err();
        assert!(err.to_string().contains("word-aligned"));
    }

    #[test]
    fn decode_words_rejects_invalid_hex() {
        assert!(decode_words("0xzz").is_err());
    }

    #[test]
    fn u64_overflow_is_an_error() {
        let mut word = [0u8; WORD_BYTES];
        word[WORD_BYTES - 9] = 1; // 2^64
        assert!(word_to_u64(&word).is_err());
        // Still a valid u128
        assert_eq!(word_to_u128(&word).unwrap(), 1u128 << 64);
    }

    #[test]
    fn u128_overflow_is_an_error() {
        let mut word = [0u8; WORD_BYTES];
        word[WORD_BYTES - 17] = 1; // 2^128
        assert!(word_to_u128(&word).is_err());
    }

    #[test]
    fn address_roundtrip() {
        let mut word = [0u8; WORD_BYTES];
        word[WORD_BYTES - 20..].copy_from_slice(&[0xab; 20]);
        assert_eq!(
            word_to_address(&word).unwrap(),
            format!("0x{}", "ab".repeat(20))
        );

        word[0] = 1;
        assert!(word_to_address(&word).is_err());
    }

    #[test]
    fn bool_rejects_wide_values() {
        let mut word = [0u8; WORD_BYTES];
        word[WORD_BYTES - 1] = 2;
        assert!(word_to_bool(&word).is_err());
    }
}
