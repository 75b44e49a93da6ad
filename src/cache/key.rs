//! Cache Key Derivation
//!
//! Turns a namespace plus a list of call arguments into a short, deterministic
//! cache key of the form `<prefix>:<hash>`.
//!
//! The digest is a 32-bit rolling polynomial hash (`h = h * 31 + c` over UTF-16
//! code units), folded to its absolute value and written in base 36. It is not
//! collision resistant; two different argument lists may share a key.

use serde_json::Value;

/// Separator placed between rendered arguments before hashing.
const ARG_SEPARATOR: &str = "|";

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// == Generate Key ==
/// Derives a cache key from a prefix and the call arguments.
///
/// Strings are used verbatim, arrays and objects as compact JSON, and other
/// scalars through their JSON display form. Object keys are rendered in sorted
/// order, so `{"a":1,"b":2}` and `{"b":2,"a":1}` produce the same key.
/// Argument order is significant.
pub fn generate_key(prefix: &str, args: &[Value]) -> String {
    let key_data = args
        .iter()
        .map(render_arg)
        .collect::<Vec<_>>()
        .join(ARG_SEPARATOR);

    format!("{}:{}", prefix, hash_code(&key_data))
}

fn render_arg(arg: &Value) -> String {
    match arg {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// == Hash Code ==
/// 32-bit rolling string hash, base-36 encoded.
pub fn hash_code(input: &str) -> String {
    let hash = input.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    });

    to_base36(i64::from(hash).unsigned_abs())
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36_DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    digits.iter().rev().map(|&d| char::from(d)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hash_code_known_values() {
        assert_eq!(hash_code(""), "0");
        // 'a' = 97 = 2 * 36 + 25
        assert_eq!(hash_code("a"), "2p");
        // 97 * 31 + 98 = 3105
        assert_eq!(hash_code("ab"), "2e9");
    }

    #[test]
    fn test_hash_code_is_lowercase_base36() {
        let hash = hash_code("a fairly long input string that will overflow 32 bits many times");
        assert!(!hash.is_empty());
        assert!(hash.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        // |i32::MIN| = 2^31 needs at most 6 base-36 digits
        assert!(hash.len() <= 6);
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(2_147_483_648), "zik0zk");
    }

    #[test]
    fn test_generate_key_format() {
        let key = generate_key("chart", &[json!("a")]);
        assert_eq!(key, "chart:2p");
    }

    #[test]
    fn test_generate_key_is_deterministic() {
        let first = generate_key("x", &[json!({"a": 1, "b": 2})]);
        let second = generate_key("x", &[json!({"a": 1, "b": 2})]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_key_ignores_object_key_order() {
        let ab = generate_key("x", &[json!({"a": 1, "b": 2})]);
        let ba = generate_key("x", &[json!({"b": 2, "a": 1})]);
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_generate_key_argument_order_matters() {
        let forward = generate_key("x", &[json!("1990-01-01"), json!("12:00")]);
        let reverse = generate_key("x", &[json!("12:00"), json!("1990-01-01")]);
        assert_ne!(forward, reverse);
    }

    #[test]
    fn test_generate_key_prefix_namespaces() {
        let args = [json!("istanbul")];
        let location = generate_key("location", &args);
        let api = generate_key("api", &args);

        assert!(location.starts_with("location:"));
        assert!(api.starts_with("api:"));
        assert_eq!(location.split(':').nth(1), api.split(':').nth(1));
    }

    #[test]
    fn test_scalars_render_like_strings() {
        // A number and its string spelling hash identically
        assert_eq!(
            generate_key("x", &[json!(41.0082)]),
            generate_key("x", &[json!("41.0082")])
        );
        assert_eq!(
            generate_key("x", &[Value::Null]),
            generate_key("x", &[json!("null")])
        );
    }

    #[test]
    fn test_no_args() {
        assert_eq!(generate_key("empty", &[]), "empty:0");
    }
}
