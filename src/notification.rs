use serde::{Deserialize, Serialize};

/// The fully formatted alert handed to the notification bus: one line of
/// text, a link, and a delivery level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub url: String,
    pub level: f64,
}

impl Notification {
    /// Create a notification with the level left at its zero default.
    /// The front end assigns the configured level before publishing.
    pub fn new(message: String, url: String) -> Self {
        Self {
            message,
            url,
            level: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_leaves_level_at_zero() {
        let n = Notification::new("hi".to_string(), "https://example.com".to_string());
        assert_eq!(n.level, 0.0);
        assert_eq!(n.message, "hi");
        assert_eq!(n.url, "https://example.com");
    }
}
