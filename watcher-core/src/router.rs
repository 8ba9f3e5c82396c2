use tracing::info;

use crate::{
    envelope::{RequestEnvelope, ResponseEnvelope},
    error::SkillError,
    event::{CITY_SLOT, IntentEvent, IntentName, SESSION_CITY, Session, SkillEvent},
    resolver::{WeatherResolver, weather_response},
    speech::{OutputSpeech, SkillResponse},
};

const WHICH_CITY: &str = "Which city would you like current weather for?";
const GUIDANCE: &str = "I can lead you through providing a city to get weather information, \
     or you can simply open Weather Watcher and ask a question like, \
     get current weather for Newcastle upon Tyne.";
const GOODBYE: &str = "Goodbye and enjoy the weather!";

/// Maps inbound platform events to skill responses.
#[derive(Debug)]
pub struct IntentRouter {
    resolver: WeatherResolver,
}

impl IntentRouter {
    pub fn new(resolver: WeatherResolver) -> Self {
        Self { resolver }
    }

    /// Handle any inbound event. Session lifecycle notifications produce no speech.
    pub async fn dispatch(
        &self,
        event: &SkillEvent,
        session: &mut Session,
    ) -> Result<Option<SkillResponse>, SkillError> {
        match event {
            SkillEvent::SessionStarted => {
                info!(session_id = session.id_or_unknown(), "session started");
                Ok(None)
            }
            SkillEvent::SessionEnded { reason } => {
                info!(session_id = session.id_or_unknown(), ?reason, "session ended");
                Ok(None)
            }
            SkillEvent::Launch => Ok(Some(self.on_launch(session))),
            SkillEvent::Intent(intent) => self.on_intent(intent, session).await.map(Some),
        }
    }

    /// Route a raw platform request and wrap the result for the wire.
    pub async fn handle_envelope(
        &self,
        envelope: RequestEnvelope,
    ) -> Result<ResponseEnvelope, SkillError> {
        let request_id = envelope.request.request_id().unwrap_or("unknown").to_string();
        let (event, mut session) = envelope.into_parts();
        info!(%request_id, session_id = session.id_or_unknown(), "handling request");

        let response = self.dispatch(&event, &mut session).await?;
        Ok(ResponseEnvelope::from_response(response.as_ref(), &session))
    }

    pub fn on_launch(&self, session: &Session) -> SkillResponse {
        info!(session_id = session.id_or_unknown(), "launch");
        welcome_response()
    }

    pub async fn on_intent(
        &self,
        intent: &IntentEvent,
        session: &mut Session,
    ) -> Result<SkillResponse, SkillError> {
        let name = intent
            .name
            .as_deref()
            .and_then(IntentName::parse)
            .ok_or_else(|| SkillError::InvalidIntent(intent.name.clone()))?;

        info!(session_id = session.id_or_unknown(), intent = %name, "intent");

        match name {
            // A one-shot request without a usable city drops into the dialog path.
            IntentName::OneShotWeather | IntentName::DialogWeather => {
                match intent.slot_value(CITY_SLOT) {
                    Some(city) => Ok(self.weather_for_slot(city, session).await),
                    None => Ok(self.weather_from_session(session).await),
                }
            }
            IntentName::Help => Ok(help_response()),
            IntentName::Stop | IntentName::Cancel => {
                Ok(SkillResponse::tell(OutputSpeech::plain(GOODBYE)))
            }
        }
    }

    /// Only a city that produced a report is remembered for later turns.
    async fn weather_for_slot(&self, city: &str, session: &mut Session) -> SkillResponse {
        match self.resolver.report(city).await {
            Ok(text) => {
                session.set_attribute(SESSION_CITY, city);
                weather_response(text)
            }
            Err(err) => weather_response(err.apology().to_string()),
        }
    }

    async fn weather_from_session(&self, session: &Session) -> SkillResponse {
        match session.remembered_city() {
            Some(city) => self.resolver.resolve(city).await,
            None => city_reprompt(),
        }
    }
}

fn welcome_response() -> SkillResponse {
    let speech = format!(
        "<speak>Welcome to Weather Watcher. I can provide the current weather for any city. {WHICH_CITY}</speak>"
    );
    let reprompt = format!("{GUIDANCE} {WHICH_CITY}");
    SkillResponse::ask(OutputSpeech::ssml(speech), OutputSpeech::plain(reprompt))
}

fn help_response() -> SkillResponse {
    let speech = format!("{GUIDANCE} Or you can say Cancel. {WHICH_CITY}");
    SkillResponse::ask(OutputSpeech::plain(speech), OutputSpeech::plain(WHICH_CITY))
}

fn city_reprompt() -> SkillResponse {
    let speech = format!("I can provide the current weather for any city. {WHICH_CITY}");
    SkillResponse::ask(OutputSpeech::plain(speech), OutputSpeech::plain(WHICH_CITY))
}
