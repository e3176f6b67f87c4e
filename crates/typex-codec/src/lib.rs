//! Identifier codec - bijective mapping between package paths and plain identifiers.
//!
//! Package paths such as `github.com/path/to/pkg` cannot appear where the host
//! language expects an identifier. The codec rewrites them into tokens built
//! only from `[A-Za-z0-9_]`:
//!
//! | path char | token text |
//! |-----------|------------|
//! | `_`       | `_u_`      |
//! | `.`       | `_d_`      |
//! | `/`       | `_s_`      |
//! | other     | `_x<hex>_` |
//!
//! and prepends [`WRAP_PREFIX`]. Paths that are already identifiers (`net`,
//! `fmt`) pass through unchanged, which also makes [`IdentCodec::wrap`]
//! idempotent on tokens it produced.
//!
//! # Example
//!
//! ```
//! use typex_codec::IdentCodec;
//!
//! let codec = IdentCodec::new();
//! let token = codec.wrap("encoding/json");
//! assert_eq!(token, "xwrap_encoding_s_json");
//! assert_eq!(codec.unwrap(&token).unwrap(), "encoding/json");
//! ```

use std::collections::HashMap;
use std::fmt::Write as _;

use parking_lot::RwLock;
use tracing::trace;
use typex_types::{is_identifier, Error, Result};

/// Prefix marking a token as an encoded path.
pub const WRAP_PREFIX: &str = "xwrap_";

/// Memoizing path/token codec.
///
/// Maintains bidirectional maps so repeated conversions of the same package
/// path are lookups. Thread-safe via internal RwLocks; the first stored
/// mapping wins under a race, and both directions always agree.
#[derive(Debug, Default)]
pub struct IdentCodec {
    /// Maps package path -> token
    path_to_token: RwLock<HashMap<String, String>>,
    /// Maps token -> package path
    token_to_path: RwLock<HashMap<String, String>>,
}

impl IdentCodec {
    /// Create a new empty codec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode a package path as a plain identifier.
    pub fn wrap(&self, path: &str) -> String {
        if path.is_empty() || is_identifier(path) {
            return path.to_string();
        }
        if let Some(token) = self.path_to_token.read().get(path) {
            return token.clone();
        }

        let token = encode(path);
        trace!(path, token = %token, "wrapped package path");
        self.remember(path, &token)
    }

    /// Decode a token back to its package path.
    ///
    /// Text that already looks like a path (contains `.` or `/`) and
    /// identifiers without [`WRAP_PREFIX`] are returned unchanged.
    pub fn unwrap(&self, token: &str) -> Result<String> {
        if token.contains(['.', '/']) {
            return Ok(token.to_string());
        }
        let Some(body) = token.strip_prefix(WRAP_PREFIX) else {
            return Ok(token.to_string());
        };
        if let Some(path) = self.token_to_path.read().get(token) {
            return Ok(path.clone());
        }

        let path = decode(body).map_err(|reason| Error::malformed(token, reason))?;
        trace!(token, path = %path, "unwrapped package token");
        // Only the decoding direction is memoized here: a hand-written token
        // may use a non-canonical escape that `wrap` would never produce.
        Ok(self
            .token_to_path
            .write()
            .entry(token.to_string())
            .or_insert(path)
            .clone())
    }

    /// Number of distinct paths encoded so far.
    pub fn len(&self) -> usize {
        self.path_to_token.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every memoized mapping.
    pub fn clear(&self) {
        self.path_to_token.write().clear();
        self.token_to_path.write().clear();
    }

    fn remember(&self, path: &str, token: &str) -> String {
        let stored = self
            .path_to_token
            .write()
            .entry(path.to_string())
            .or_insert_with(|| token.to_string())
            .clone();
        self.token_to_path
            .write()
            .entry(stored.clone())
            .or_insert_with(|| path.to_string());
        stored
    }
}

fn encode(path: &str) -> String {
    let mut out = String::with_capacity(WRAP_PREFIX.len() + path.len() * 2);
    out.push_str(WRAP_PREFIX);
    for c in path.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' => out.push(c),
            '_' => out.push_str("_u_"),
            '.' => out.push_str("_d_"),
            '/' => out.push_str("_s_"),
            _ => {
                let _ = write!(out, "_x{:x}_", c as u32);
            }
        }
    }
    out
}

fn decode(body: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;
    while let Some(pos) = rest.find('_') {
        out.push_str(&rest[..pos]);
        let escape = &rest[pos + 1..];
        let Some(end) = escape.find('_') else {
            return Err(format!("unterminated escape at {:?}", &rest[pos..]));
        };
        let code = &escape[..end];
        let c = match code {
            "u" => '_',
            "d" => '.',
            "s" => '/',
            _ => code
                .strip_prefix('x')
                .filter(|hex| !hex.is_empty())
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .and_then(char::from_u32)
                .ok_or_else(|| format!("unknown escape '_{}_'", code))?,
        };
        out.push(c);
        rest = &escape[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_known_paths() {
        let codec = IdentCodec::new();
        let cases = [
            ("net", "net"),
            ("fmt", "fmt"),
            ("encoding/json", "xwrap_encoding_s_json"),
            (
                "github.com/path/to/pkg.Type",
                "xwrap_github_d_com_s_path_s_to_s_pkg_d_Type",
            ),
            (
                "github.com/path/to/pkg_test.Type",
                "xwrap_github_d_com_s_path_s_to_s_pkg_u_test_d_Type",
            ),
        ];
        for (path, token) in cases {
            assert_eq!(codec.wrap(path), token, "wrap({})", path);
            assert_eq!(codec.unwrap(token).unwrap(), path, "unwrap({})", token);
        }
    }

    #[test]
    fn test_wrap_escapes_other_characters() {
        let codec = IdentCodec::new();
        let token = codec.wrap("a/b-c.d/v2");
        assert_eq!(token, "xwrap_a_s_b_x2d_c_d_d_s_v2");
        assert!(is_identifier(&token));
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_'));
        assert_eq!(codec.unwrap(&token).unwrap(), "a/b-c.d/v2");
    }

    #[test]
    fn test_overlapping_sequences_round_trip() {
        let codec = IdentCodec::new();
        for path in ["a_s/b", "x_d_.y", "_u_/_", "a__b/c", "héllo/wörld"] {
            let token = codec.wrap(path);
            assert!(is_identifier(&token), "{} -> {}", path, token);
            assert_eq!(codec.unwrap(&token).unwrap(), path);
        }
    }

    #[test]
    fn test_idempotent() {
        let codec = IdentCodec::new();
        assert_eq!(codec.wrap("xwrap_net"), "xwrap_net");
        assert_eq!(codec.unwrap("xwrap_net").unwrap(), "net");

        let token = codec.wrap("encoding/json");
        assert_eq!(codec.wrap(&token), token);
        assert_eq!(codec.unwrap("encoding/json").unwrap(), "encoding/json");
        assert_eq!(codec.unwrap("fmt").unwrap(), "fmt");
    }

    #[test]
    fn test_decode_without_prior_wrap() {
        let codec = IdentCodec::new();
        assert_eq!(
            codec.unwrap("xwrap_example_d_com_s_m").unwrap(),
            "example.com/m"
        );
        assert_eq!(codec.wrap("example.com/m"), "xwrap_example_d_com_s_m");
    }

    #[test]
    fn test_malformed_token() {
        let codec = IdentCodec::new();
        assert!(matches!(
            codec.unwrap("xwrap_a_q_b"),
            Err(Error::MalformedInput { .. })
        ));
        assert!(codec.unwrap("xwrap_a_s").is_err());
        assert!(codec.unwrap("xwrap_a_x_b").is_err());
    }

    #[test]
    fn test_clear() {
        let codec = IdentCodec::new();
        codec.wrap("a/b");
        codec.wrap("c/d");
        assert_eq!(codec.len(), 2);
        codec.clear();
        assert!(codec.is_empty());
        assert_eq!(codec.wrap("a/b"), "xwrap_a_s_b");
    }

    #[test]
    fn test_concurrent_wrap_agrees() {
        use rayon::prelude::*;

        let codec = IdentCodec::new();
        let paths: Vec<String> = (0..256).map(|i| format!("host.io/mod{}/pkg", i % 16)).collect();
        let tokens: Vec<String> = paths.par_iter().map(|p| codec.wrap(p)).collect();
        for (path, token) in paths.iter().zip(&tokens) {
            assert_eq!(&codec.unwrap(token).unwrap(), path);
        }
        assert_eq!(codec.len(), 16);
    }
}
