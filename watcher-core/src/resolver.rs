//! Weather lookup and the sentence the skill speaks for it.

use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::{
    error::ProviderError,
    model::{WeatherQuery, WeatherResult, round_degrees},
    provider::WeatherProvider,
    speech::{CARD_TITLE, Card, OutputSpeech, SkillResponse},
};

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

/// Parse an OpenWeatherMap current-conditions document.
pub fn parse_weather(body: &str) -> Result<WeatherResult, ProviderError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    Ok(WeatherResult {
        current_temp_c: parsed.main.temp,
        min_temp_c: parsed.main.temp_min,
        max_temp_c: parsed.main.temp_max,
        condition_phrases: parsed.weather.into_iter().map(|w| w.description).collect(),
    })
}

/// "a", "a and b", "a, b and c". Blank and repeated phrases are dropped.
pub fn join_conditions(phrases: &[String]) -> String {
    let mut distinct: Vec<&str> = Vec::with_capacity(phrases.len());
    for phrase in phrases.iter().map(|p| p.trim()) {
        if !phrase.is_empty() && !distinct.contains(&phrase) {
            distinct.push(phrase);
        }
    }

    match distinct.split_last() {
        None => String::new(),
        Some((last, [])) => (*last).to_string(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}

fn degrees(value: i64) -> String {
    if value.abs() == 1 {
        format!("{value} degree")
    } else {
        format!("{value} degrees")
    }
}

/// Render the spoken weather report for `city`.
pub fn render_sentence(city: &str, weather: &WeatherResult) -> String {
    let mut sentence = format!("It is {} celsius", degrees(round_degrees(weather.current_temp_c)));

    let conditions = join_conditions(&weather.condition_phrases);
    if !conditions.is_empty() {
        sentence.push_str(" with ");
        sentence.push_str(&conditions);
    }

    sentence.push_str(&format!(
        " in {city}. Today's maximum temperature is {} celsius and minimum temperature is {} celsius.",
        degrees(round_degrees(weather.max_temp_c)),
        degrees(round_degrees(weather.min_temp_c)),
    ));

    sentence
}

/// Final turn for a weather lookup: plain text, card mirroring the speech, session closed.
pub fn weather_response(text: String) -> SkillResponse {
    let card = Card::new(CARD_TITLE, text.clone());
    SkillResponse::tell_with_card(OutputSpeech::plain(text), card)
}

/// Looks up current conditions for a city and renders them. Never fails:
/// provider problems become an apology the user can hear.
#[derive(Debug)]
pub struct WeatherResolver {
    provider: Box<dyn WeatherProvider>,
}

impl WeatherResolver {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    pub async fn resolve(&self, city: &str) -> SkillResponse {
        let text = match self.report(city).await {
            Ok(text) => text,
            Err(err) => err.apology().to_string(),
        };
        weather_response(text)
    }

    /// Spoken report for `city`, or the provider failure that prevented it.
    pub async fn report(&self, city: &str) -> Result<String, ProviderError> {
        let query = WeatherQuery::new(city);

        let body = self.provider.fetch_current(&query).await.inspect_err(|err| {
            warn!(city, error = %err, "weather lookup failed");
        })?;

        let weather = parse_weather(&body).inspect_err(|err| {
            error!(city, error = %err, "could not parse weather provider response");
        })?;

        debug!(city, ?weather, "parsed weather");
        Ok(render_sentence(city, &weather))
    }
}
