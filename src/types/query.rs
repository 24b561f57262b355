use chrono::Duration;

/// Trailing window accepted by range queries. Unrecognized selectors fall
/// back to one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeSelector {
    #[default]
    OneHour,
    Day,
    Week,
}

impl RangeSelector {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "24h" => RangeSelector::Day,
            "7d" => RangeSelector::Week,
            _ => RangeSelector::OneHour,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            RangeSelector::OneHour => Duration::hours(1),
            RangeSelector::Day => Duration::hours(24),
            RangeSelector::Week => Duration::days(7),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RangeSelector::OneHour => "1h",
            RangeSelector::Day => "24h",
            RangeSelector::Week => "7d",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_selectors() {
        assert_eq!(RangeSelector::parse("1h"), RangeSelector::OneHour);
        assert_eq!(RangeSelector::parse("24h"), RangeSelector::Day);
        assert_eq!(RangeSelector::parse("7d"), RangeSelector::Week);
    }

    #[test]
    fn test_unrecognized_selector_defaults_to_one_hour() {
        assert_eq!(RangeSelector::parse("30m"), RangeSelector::OneHour);
        assert_eq!(RangeSelector::parse(""), RangeSelector::OneHour);
    }

    #[test]
    fn test_durations() {
        assert_eq!(RangeSelector::OneHour.duration(), Duration::hours(1));
        assert_eq!(RangeSelector::Week.duration(), Duration::days(7));
    }
}
