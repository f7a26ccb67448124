//! Implements the `pwnedpassword` and `range` routes against an [`Engine`].

use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use hibp_verifier::hashutil::{hex_decode_hash, hex_decode_prefix5, hex_encode_upper, is_hex, sha1};
use hibp_verifier::{Engine, HASH_LEN};
use http_body_util::{BodyExt, Full, StreamBody, combinators::BoxBody};
use http_body::Frame;

use crate::error::HttpError;

pub type ResponseBody = BoxBody<Bytes, std::io::Error>;

pub fn full_body(bytes: impl Into<Bytes>) -> ResponseBody {
    Full::new(bytes.into()).map_err(|never: Infallible| match never {}).boxed()
}

/// `GET /pwnedpassword/{value}`.
///
/// `{value}` is treated as an already-hex-encoded hash if it is exactly 40
/// hex characters; otherwise its raw UTF-8 bytes are SHA-1 hashed.
pub async fn pwnedpassword(engine: &Arc<Engine>, value: &str) -> Result<ResponseBody, HttpError> {
    let hash = resolve_hash(value);
    let freq = engine.pwned_async(hash).await?;
    Ok(full_body(format!("{freq}\n")))
}

fn resolve_hash(value: &str) -> [u8; HASH_LEN] {
    if value.len() == HASH_LEN * 2 && is_hex(value.as_bytes()) {
        // Length and hex-ness already checked; decode cannot fail here.
        hex_decode_hash(value.as_bytes()).expect("checked 40-hex-char input")
    } else {
        sha1(value.as_bytes())
    }
}

/// `GET /range/{prefix5}`.
///
/// Streams `"{HEX35}:{freq}\r\n"` lines for every record in the bucket
/// range, without materializing the whole response in memory: the blocking
/// [`Engine::scan`] runs on a `spawn_blocking` thread and feeds formatted
/// lines into a bounded channel that the response body streams out of.
pub fn range(engine: Arc<Engine>, prefix5: &str) -> Result<ResponseBody, HttpError> {
    if prefix5.len() != 5 || !is_hex(prefix5.as_bytes()) {
        return Err(HttpError::MalformedRequest(format!(
            "range prefix must be exactly 5 hex characters, got {prefix5:?}"
        )));
    }
    // Unwraps below are safe: length and hex-ness were just checked above,
    // and '0'/'F' are valid low nibbles by construction.
    let start = hex_decode_prefix5(prefix5.as_bytes(), b'0').expect("checked 5-hex-char prefix");
    let end = hex_decode_prefix5(prefix5.as_bytes(), b'F').expect("checked 5-hex-char prefix");

    let (tx, mut rx) = tokio::sync::mpsc::channel::<std::io::Result<Bytes>>(32);

    tokio::task::spawn_blocking(move || {
        let mut line = Vec::with_capacity(64);
        let result = engine.scan(start, end, |hash, freq| {
            line.clear();
            // The public API splits the 40-character hex string, not the
            // 20-byte array: the client sends the first 5 hex characters
            // (2.5 bytes) and gets the remaining 35 back, which straddles a
            // byte boundary mid-nibble.
            let full_hex = hex_encode_upper(hash);
            line.extend_from_slice(full_hex[5..].as_bytes());
            line.push(b':');
            line.extend_from_slice(freq.to_string().as_bytes());
            line.extend_from_slice(b"\r\n");
            tx.blocking_send(Ok(Bytes::copy_from_slice(&line))).is_err()
        });
        if let Err(e) = result {
            let _ = tx.blocking_send(Err(std::io::Error::other(e.to_string())));
        }
    });

    let stream = async_stream::stream! {
        while let Some(chunk) = rx.recv().await {
            yield chunk.map(Frame::data);
        }
    };

    Ok(StreamBody::new(stream).boxed())
}
