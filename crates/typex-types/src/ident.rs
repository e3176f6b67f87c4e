//! Identifier predicates for the host language.

/// Whether `s` is a valid identifier: a letter or `_` followed by letters,
/// digits or `_`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// Whether a member name is visible outside its package.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("net"));
        assert!(is_identifier("_x1"));
        assert!(is_identifier("xwrap_a_s_b"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("encoding/json"));
        assert!(!is_identifier("a-b"));
    }

    #[test]
    fn test_is_exported() {
        assert!(is_exported("String"));
        assert!(!is_exported("string"));
        assert!(!is_exported("_Hidden"));
        assert!(!is_exported(""));
    }
}
