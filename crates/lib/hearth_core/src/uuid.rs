// Identifier helpers.
//
// Posts, feed members and help requests use UUIDv7 so that ids sort by
// creation time. Neighbourhood identities use their email instead.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

/// Help request id: requester id plus a timestamp-embedding UUIDv7.
pub fn help_request_id(elder_id: &str) -> String {
    format!("{elder_id}-{}", uuidv7().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuidv7_is_valid() {
        let id = uuidv7();
        assert_eq!(id.get_version(), Some(uuid::Version::SortRand));
    }

    #[test]
    fn help_request_ids_are_prefixed_and_unique() {
        let a = help_request_id("elder@example.com");
        let b = help_request_id("elder@example.com");
        assert!(a.starts_with("elder@example.com-"));
        assert_ne!(a, b);
    }
}
