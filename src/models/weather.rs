//! Weather snapshot model and display methods

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Current conditions for a place, valid only at fetch time
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Condition description as returned by the service
    pub description: String,
    /// When this snapshot was fetched
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Format temperature with unit; whole degrees keep one decimal (`30.0°C`)
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:?}°C", self.temperature)
    }

    /// Format humidity with unit
    #[must_use]
    pub fn format_humidity(&self) -> String {
        format!("{}%", self.humidity)
    }

    /// Condition description with its first character capitalized
    #[must_use]
    pub fn format_description(&self) -> String {
        capitalize_first(&self.description)
    }
}

/// Uppercase the first character, leave the remainder untouched
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn snapshot(description: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature: 27.4,
            humidity: 83,
            description: description.to_string(),
            fetched_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("light rain", "Light rain")]
    #[case("overcast clouds", "Overcast clouds")]
    #[case("Clear sky", "Clear sky")]
    #[case("haze IN city", "Haze IN city")]
    #[case("", "")]
    #[case("éclair", "Éclair")]
    fn test_capitalize_first(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(capitalize_first(input), expected);
    }

    #[test]
    fn test_display_formatting() {
        let weather = snapshot("light rain");
        assert_eq!(weather.format_temperature(), "27.4°C");
        assert_eq!(weather.format_humidity(), "83%");
        assert_eq!(weather.format_description(), "Light rain");

        let whole = WeatherSnapshot {
            temperature: 30.0,
            ..snapshot("clear sky")
        };
        assert_eq!(whole.format_temperature(), "30.0°C");

        let freezing = WeatherSnapshot {
            temperature: -2.5,
            ..snapshot("snow")
        };
        assert_eq!(freezing.format_temperature(), "-2.5°C");
    }
}
