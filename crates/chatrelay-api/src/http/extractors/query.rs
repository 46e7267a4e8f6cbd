//! Query parameters for the history endpoint.

use serde::Deserialize;

use chatrelay_types::error::ValidationError;

/// Query parameters for `GET /messages`.
///
/// Both fields are kept as raw strings so that a malformed value becomes a
/// validation error in the regular `{error, stage}` shape instead of an
/// extractor rejection.
#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    /// Channel to read. Required.
    pub channel: Option<String>,
    /// Return only messages with an `id` below this one.
    pub before: Option<String>,
}

impl HistoryQuery {
    pub fn channel(&self) -> &str {
        self.channel.as_deref().unwrap_or_default()
    }

    /// Parse `before`. An absent or empty value means "start at the newest".
    pub fn cursor(&self) -> Result<Option<i64>, ValidationError> {
        match self.before.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse::<i64>().map(Some).map_err(|_| {
                ValidationError::Malformed(format!("before must be an integer message id, got {raw:?}"))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(before: Option<&str>) -> HistoryQuery {
        HistoryQuery {
            channel: Some("general".to_string()),
            before: before.map(str::to_string),
        }
    }

    #[test]
    fn cursor_absent_or_empty_is_none() {
        assert_eq!(query(None).cursor().unwrap(), None);
        assert_eq!(query(Some("")).cursor().unwrap(), None);
    }

    #[test]
    fn cursor_parses_integer() {
        assert_eq!(query(Some("42")).cursor().unwrap(), Some(42));
    }

    #[test]
    fn cursor_rejects_garbage() {
        let err = query(Some("abc")).cursor().unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }

    #[test]
    fn missing_channel_reads_as_empty() {
        assert_eq!(HistoryQuery::default().channel(), "");
    }
}
