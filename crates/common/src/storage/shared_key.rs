//! Shared Key request signing for the Blob service.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::Url;

use super::error::StorageError;

type HmacSha256 = Hmac<Sha256>;

pub(crate) struct SignedRequest<'a> {
    pub method: &'a str,
    pub content_length: usize,
    pub content_type: &'a str,
    /// `x-ms-*` headers, keys lowercase.
    pub ms_headers: &'a BTreeMap<String, String>,
    pub url: &'a Url,
}

pub(crate) fn string_to_sign(account: &str, request: &SignedRequest<'_>) -> String {
    // a zero length is signed as empty
    let content_length = match request.content_length {
        0 => String::new(),
        n => n.to_string(),
    };

    // VERB, Content-Encoding, Content-Language, Content-Length, Content-MD5,
    // Content-Type, Date, If-Modified-Since, If-Match, If-None-Match,
    // If-Unmodified-Since, Range
    let mut out = format!(
        "{}\n\n\n{}\n\n{}\n\n\n\n\n\n\n",
        request.method, content_length, request.content_type
    );

    for (name, value) in request.ms_headers {
        out.push_str(name);
        out.push(':');
        out.push_str(value.trim());
        out.push('\n');
    }

    out.push('/');
    out.push_str(account);
    out.push_str(request.url.path());

    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in request.url.query_pairs() {
        params
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into_owned());
    }
    for (name, mut values) in params {
        values.sort();
        out.push('\n');
        out.push_str(&name);
        out.push(':');
        out.push_str(&values.join(","));
    }

    out
}

pub(crate) fn sign(key: &[u8], string_to_sign: &str) -> Result<String, StorageError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| StorageError::InvalidAccountKey)?;
    mac.update(string_to_sign.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
