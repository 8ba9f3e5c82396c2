use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
        }
    }
}

/// One lookup against the weather provider. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
    pub units: Units,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>) -> Self {
        Self { city: city.into(), units: Units::Metric }
    }
}

/// Current conditions as returned by one successful provider call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub current_temp_c: f64,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub condition_phrases: Vec<String>,
}

/// Nearest whole degree, halves rounded up (2.5 -> 3, -2.5 -> -2).
pub fn round_degrees(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_nearest_degree() {
        assert_eq!(round_degrees(15.4), 15);
        assert_eq!(round_degrees(15.5), 16);
        assert_eq!(round_degrees(-0.4), 0);
        assert_eq!(round_degrees(-2.5), -2);
        assert_eq!(round_degrees(-2.6), -3);
    }

    #[test]
    fn query_defaults_to_metric() {
        let query = WeatherQuery::new("London");
        assert_eq!(query.units.as_str(), "metric");
        assert_eq!(query.city, "London");
    }
}
