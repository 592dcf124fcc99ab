//! Client-session identifiers: `{prefix}-{unix_millis}-{random}`.
//!
//! Uniqueness is probabilistic. Good enough for a session-scoped list of
//! annotations or a handful of saved templates.

use ahash::RandomState;
use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate an id such as `annotation-1718000000000-k3x9q2a`.
pub fn generate_id(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    // Fresh random keys per call.
    let random = RandomState::new().hash_one((millis, n));
    format!("{prefix}-{millis}-{}", to_base36(random % 78_364_164_096)) // 36^7
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_carry_prefix_and_differ() {
        let a = generate_id("annotation");
        let b = generate_id("annotation");
        assert!(a.starts_with("annotation-"));
        assert_ne!(a, b);
        assert_eq!(a.split('-').count(), 3);
    }

    #[test]
    fn base36_digits() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
