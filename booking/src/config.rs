//! Configuration for the booking engine.

/// Settings the booking engine needs beyond its providers.
///
/// Base URLs are used only to build links embedded in outgoing email; the
/// engine itself never serves HTTP.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Base URL of the self-service manage page; the appointment token is
    /// appended as a path segment.
    pub manage_base_url: String,
    /// Base URL of the playback page; the share token is appended.
    pub playback_base_url: String,
    /// Internal staff address copied on booking activity.
    pub staff_email: String,
}

impl BookingConfig {
    /// Create a configuration.
    #[must_use]
    pub const fn new(
        manage_base_url: String,
        playback_base_url: String,
        staff_email: String,
    ) -> Self {
        Self {
            manage_base_url,
            playback_base_url,
            staff_email,
        }
    }

    /// Self-service manage URL for an appointment token.
    #[must_use]
    pub fn manage_url(&self, token: &str) -> String {
        format!("{}/{token}", self.manage_base_url.trim_end_matches('/'))
    }

    /// Playback URL for a share token.
    #[must_use]
    pub fn playback_url(&self, token: &str) -> String {
        format!("{}/{token}", self.playback_base_url.trim_end_matches('/'))
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            manage_base_url: "http://localhost:8080/manage".to_string(),
            playback_base_url: "http://localhost:8080/listen".to_string(),
            staff_email: "bookings@dearly.local".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_tolerate_trailing_slash() {
        let config = BookingConfig::new(
            "https://dearly.example/manage/".to_string(),
            "https://dearly.example/listen".to_string(),
            "staff@dearly.example".to_string(),
        );
        assert_eq!(config.manage_url("tok"), "https://dearly.example/manage/tok");
        assert_eq!(config.playback_url("tok"), "https://dearly.example/listen/tok");
    }
}
