//! Assertion helpers with readable failure messages.

use typex::{Error, MethodInfo};

/// Assert that a result is Ok and return the inner value.
#[allow(dead_code)]
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>, context: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("{} failed: {:?}", context, e),
    }
}

/// Assert that an error's message contains `expected_text`.
#[allow(dead_code)]
pub fn assert_error_contains(error: &Error, expected_text: &str, context: &str) {
    let message = error.to_string();
    assert!(
        message.contains(expected_text),
        "{}: error message {:?} should contain {:?}",
        context,
        message,
        expected_text
    );
}

/// Names of a resolved method set, in order.
#[allow(dead_code)]
pub fn method_names(methods: &[MethodInfo]) -> Vec<&str> {
    methods.iter().map(|m| m.name.as_str()).collect()
}
