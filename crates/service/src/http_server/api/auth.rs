use std::collections::HashMap;

use http::HeaderMap;

pub const FUNCTION_KEY_HEADER: &str = "x-functions-key";
pub const FUNCTION_KEY_QUERY: &str = "code";

/// Function-level key check. With no key configured every request passes.
pub fn authorize(
    expected: Option<&str>,
    headers: &HeaderMap,
    params: &HashMap<String, String>,
) -> bool {
    let Some(expected) = expected else {
        return true;
    };

    let presented = headers
        .get(FUNCTION_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .or_else(|| params.get(FUNCTION_KEY_QUERY).map(String::as_str));

    match presented {
        Some(presented) => constant_time_eq(presented.as_bytes(), expected.as_bytes()),
        None => false,
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
