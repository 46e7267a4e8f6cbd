//! Input validation for submitted messages and history queries.
//!
//! Lengths are counted in characters, not bytes, so multi-byte channel names
//! get the same budget as ASCII ones.

use chatrelay_types::error::ValidationError;
use chatrelay_types::message::{MAX_CHANNEL_LEN, MAX_USER_ID_LEN, NewMessage, SubmitMessageRequest};

/// Turn a raw submission into a message that may be persisted.
///
/// Fields are checked in wire order (`channel`, `user_id`, `message`) and the
/// first failure is returned.
pub fn validate_submission(req: SubmitMessageRequest) -> Result<NewMessage, ValidationError> {
    validate_channel(&req.channel)?;
    check_bounded("user_id", &req.user_id, MAX_USER_ID_LEN)?;
    if req.body.is_empty() {
        return Err(ValidationError::Missing { field: "message" });
    }

    Ok(NewMessage {
        channel: req.channel,
        user_id: req.user_id,
        body: req.body,
        is_read: req.is_read,
    })
}

/// A channel name must be non-empty and at most `MAX_CHANNEL_LEN` characters.
pub fn validate_channel(channel: &str) -> Result<(), ValidationError> {
    check_bounded("channel", channel, MAX_CHANNEL_LEN)
}

/// History cursors are sequence IDs, which start at 1.
pub fn validate_cursor(before: Option<i64>) -> Result<(), ValidationError> {
    match before {
        Some(cursor) if cursor <= 0 => Err(ValidationError::InvalidCursor(cursor)),
        _ => Ok(()),
    }
}

fn check_bounded(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Missing { field });
    }
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(channel: &str, user_id: &str, body: &str) -> SubmitMessageRequest {
        SubmitMessageRequest {
            channel: channel.to_string(),
            user_id: user_id.to_string(),
            body: body.to_string(),
            is_read: false,
        }
    }

    #[test]
    fn test_valid_submission_passes_through() {
        let mut req = request("admin-chat", "u1", "hello");
        req.is_read = true;
        let msg = validate_submission(req).unwrap();
        assert_eq!(msg.channel, "admin-chat");
        assert_eq!(msg.user_id, "u1");
        assert_eq!(msg.body, "hello");
        assert!(msg.is_read);
    }

    #[test]
    fn test_missing_fields_are_named() {
        assert_eq!(
            validate_submission(request("", "u1", "hi")).unwrap_err(),
            ValidationError::Missing { field: "channel" }
        );
        assert_eq!(
            validate_submission(request("general", "", "hi")).unwrap_err(),
            ValidationError::Missing { field: "user_id" }
        );
        assert_eq!(
            validate_submission(request("general", "u1", "")).unwrap_err(),
            ValidationError::Missing { field: "message" }
        );
    }

    #[test]
    fn test_length_bounds_are_inclusive() {
        let channel = "c".repeat(MAX_CHANNEL_LEN);
        let user_id = "u".repeat(MAX_USER_ID_LEN);
        assert!(validate_submission(request(&channel, &user_id, "hi")).is_ok());

        let err = validate_submission(request(&"c".repeat(101), "u1", "hi")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooLong {
                field: "channel",
                max: 100,
                actual: 101
            }
        );

        let err = validate_submission(request("general", &"u".repeat(51), "hi")).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { field: "user_id", actual: 51, .. }));
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        // 100 two-byte characters is 200 bytes but still within the limit.
        let channel = "é".repeat(MAX_CHANNEL_LEN);
        assert!(validate_channel(&channel).is_ok());
        assert!(validate_channel(&"é".repeat(MAX_CHANNEL_LEN + 1)).is_err());
    }

    #[test]
    fn test_long_body_is_accepted() {
        let body = "x".repeat(64 * 1024);
        assert!(validate_submission(request("general", "u1", &body)).is_ok());
    }

    #[test]
    fn test_cursor_must_be_positive() {
        assert!(validate_cursor(None).is_ok());
        assert!(validate_cursor(Some(1)).is_ok());
        assert_eq!(validate_cursor(Some(0)).unwrap_err(), ValidationError::InvalidCursor(0));
        assert_eq!(validate_cursor(Some(-3)).unwrap_err(), ValidationError::InvalidCursor(-3));
    }
}
