//! Signing identity secret decoding and encoding.
//!
//! The persisted form is the textual bracketed byte list, e.g.
//! `[12,34,...]`, covering the 64-byte secret+public halves of an ed25519
//! keypair. This module does not read or write the environment; callers own
//! storage and pass the stored text in.

use solana_sdk::signature::Keypair;

use crate::error::{TallyError, TallyResult};

/// Serialized keypair length: secret and public halves.
pub const SECRET_LEN: usize = 64;

/// Decode a stored secret into a keypair.
///
/// Wrong length, non-numeric content, or an inconsistent public half are all
/// configuration errors; nothing here is retried.
pub fn decode_secret(text: &str) -> TallyResult<Keypair> {
    let bytes: Vec<u8> = serde_json::from_str(text.trim()).map_err(|err| {
        TallyError::configuration(format!("stored signer key is not a byte list: {err}"))
    })?;
    if bytes.len() != SECRET_LEN {
        return Err(TallyError::configuration(format!(
            "stored signer key has {} bytes, expected {SECRET_LEN}",
            bytes.len()
        )));
    }
    Keypair::from_bytes(&bytes).map_err(|err| {
        TallyError::configuration(format!("stored signer key is not a valid keypair: {err}"))
    })
}

/// Serialize a keypair into the persisted textual form.
pub fn encode_secret(keypair: &Keypair) -> String {
    let bytes = keypair.to_bytes();
    let inner: Vec<String> = bytes.iter().map(u8::to_string).collect();
    format!("[{}]", inner.join(","))
}
