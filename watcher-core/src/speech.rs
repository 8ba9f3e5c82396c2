//! What the skill says back: speech, reprompt and the companion card.

use serde::{Deserialize, Serialize};

/// Title of every card the skill shows.
pub const CARD_TITLE: &str = "Weather Watcher";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    PlainText { text: String },
    #[serde(rename = "SSML")]
    Ssml { ssml: String },
}

impl OutputSpeech {
    pub fn plain(text: impl Into<String>) -> Self {
        OutputSpeech::PlainText { text: text.into() }
    }

    pub fn ssml(ssml: impl Into<String>) -> Self {
        OutputSpeech::Ssml { ssml: ssml.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            OutputSpeech::PlainText { text } => text,
            OutputSpeech::Ssml { ssml } => ssml,
        }
    }

    pub fn is_ssml(&self) -> bool {
        matches!(self, OutputSpeech::Ssml { .. })
    }
}

/// Simple text card shown in the companion app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    pub content: String,
}

impl Card {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { title: title.into(), content: content.into() }
    }
}

/// A finished turn. Either a tell (ends the session, no reprompt) or an ask
/// (keeps the session open, always carries a reprompt).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillResponse {
    speech: OutputSpeech,
    reprompt: Option<OutputSpeech>,
    card: Option<Card>,
    ends_session: bool,
}

impl SkillResponse {
    pub fn tell(speech: OutputSpeech) -> Self {
        Self { speech, reprompt: None, card: None, ends_session: true }
    }

    pub fn tell_with_card(speech: OutputSpeech, card: Card) -> Self {
        Self { speech, reprompt: None, card: Some(card), ends_session: true }
    }

    pub fn ask(speech: OutputSpeech, reprompt: OutputSpeech) -> Self {
        Self { speech, reprompt: Some(reprompt), card: None, ends_session: false }
    }

    pub fn speech(&self) -> &OutputSpeech {
        &self.speech
    }

    pub fn spoken_text(&self) -> &str {
        self.speech.text()
    }

    pub fn is_ssml(&self) -> bool {
        self.speech.is_ssml()
    }

    pub fn reprompt(&self) -> Option<&OutputSpeech> {
        self.reprompt.as_ref()
    }

    pub fn reprompt_text(&self) -> Option<&str> {
        self.reprompt.as_ref().map(OutputSpeech::text)
    }

    pub fn card(&self) -> Option<&Card> {
        self.card.as_ref()
    }

    pub fn card_title(&self) -> Option<&str> {
        self.card.as_ref().map(|c| c.title.as_str())
    }

    pub fn card_body(&self) -> Option<&str> {
        self.card.as_ref().map(|c| c.content.as_str())
    }

    pub fn ends_session(&self) -> bool {
        self.ends_session
    }
}
