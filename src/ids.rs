//! Record id generation
//!
//! Ids are `{prefix}-{millis}-{suffix}`: wall-clock milliseconds plus a short
//! random suffix. Collisions are possible in principle and accepted; nothing
//! in the engine depends on ids being dense or ordered.

use jiff::Timestamp;
use uuid::Uuid;

/// Generate a fresh record id with the given entity prefix.
#[must_use]
pub fn generate(prefix: &str) -> String {
    let millis = Timestamp::now().as_millisecond();
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(7).collect();
    format!("{prefix}-{millis}-{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_carry_the_prefix() {
        let id = generate("ag");

        assert!(id.starts_with("ag-"), "id {id:?} must start with prefix");
    }

    #[test]
    fn consecutive_ids_differ() {
        let a = generate("s");
        let b = generate("s");

        assert_ne!(a, b, "random suffix must keep consecutive ids distinct");
    }
}
