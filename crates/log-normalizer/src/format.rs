//! Log Shape Classification

/// Recognized upload shapes, decided from the header row alone before any
/// row parsing happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One row per `(SECONDS, PID, VALUE)` triple
    Long,
    /// One row per timestamp: `time(ms)` plus one column per sensor
    Wide,
}

/// Marker columns for the long shape
pub(crate) const LONG_MARKERS: [&str; 3] = ["SECONDS", "PID", "VALUE"];

/// Marker column for the wide shape
pub(crate) const WIDE_MARKER: &str = "time(ms)";

impl LogFormat {
    /// Classify trimmed header names.
    ///
    /// Long takes precedence when both marker sets coexist in one file.
    pub fn detect(headers: &[String]) -> Option<Self> {
        let has = |name: &str| headers.iter().any(|h| h == name);

        if LONG_MARKERS.iter().all(|m| has(m)) {
            Some(LogFormat::Long)
        } else if has(WIDE_MARKER) {
            Some(LogFormat::Wide)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detect_long() {
        let h = headers(&["SECONDS", "PID", "VALUE"]);
        assert_eq!(LogFormat::detect(&h), Some(LogFormat::Long));
    }

    #[test]
    fn test_detect_wide() {
        let h = headers(&["time(ms)", "RPM", "Speed"]);
        assert_eq!(LogFormat::detect(&h), Some(LogFormat::Wide));
    }

    #[test]
    fn test_long_wins_when_both_marker_sets_present() {
        let h = headers(&["time(ms)", "SECONDS", "PID", "VALUE"]);
        assert_eq!(LogFormat::detect(&h), Some(LogFormat::Long));
    }

    #[test]
    fn test_partial_long_markers_are_not_long() {
        let h = headers(&["SECONDS", "PID"]);
        assert_eq!(LogFormat::detect(&h), None);
    }

    #[test]
    fn test_unrecognized() {
        let h = headers(&["timestamp", "value"]);
        assert_eq!(LogFormat::detect(&h), None);
    }
}
