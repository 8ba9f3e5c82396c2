use std::collections::HashMap;

/// Slot carrying the city in both weather intents.
pub const CITY_SLOT: &str = "City";

/// Session attribute remembering a city across turns.
pub const SESSION_CITY: &str = "City";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentName {
    OneShotWeather,
    DialogWeather,
    Help,
    Stop,
    Cancel,
}

impl IntentName {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentName::OneShotWeather => "OneShotWeatherIntent",
            IntentName::DialogWeather => "DialogWeatherIntent",
            IntentName::Help => "AMAZON.HelpIntent",
            IntentName::Stop => "AMAZON.StopIntent",
            IntentName::Cancel => "AMAZON.CancelIntent",
        }
    }

    pub const fn all() -> &'static [IntentName] {
        &[
            IntentName::OneShotWeather,
            IntentName::DialogWeather,
            IntentName::Help,
            IntentName::Stop,
            IntentName::Cancel,
        ]
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::all().iter().copied().find(|name| name.as_str() == value)
    }
}

impl std::fmt::Display for IntentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recognised utterance as delivered by the voice platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentEvent {
    pub name: Option<String>,
    pub slots: HashMap<String, Option<String>>,
}

impl IntentEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), slots: HashMap::new() }
    }

    pub fn with_slot(mut self, slot: impl Into<String>, value: Option<String>) -> Self {
        self.slots.insert(slot.into(), value);
        self
    }

    /// Slot value exactly as heard; absent, empty and whitespace-only values count as missing.
    pub fn slot_value(&self, slot: &str) -> Option<&str> {
        self.slots
            .get(slot)
            .and_then(|v| v.as_deref())
            .filter(|v| !v.trim().is_empty())
    }
}

/// Attribute store scoped to one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub id: Option<String>,
    pub is_new: bool,
    pub attributes: HashMap<String, String>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()), is_new: true, attributes: HashMap::new() }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn remembered_city(&self) -> Option<&str> {
        self.attribute(SESSION_CITY).filter(|c| !c.trim().is_empty())
    }

    pub fn id_or_unknown(&self) -> &str {
        self.id.as_deref().unwrap_or("unknown")
    }
}

/// Inbound event kinds the skill reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillEvent {
    SessionStarted,
    Launch,
    Intent(IntentEvent),
    SessionEnded { reason: Option<String> },
}
