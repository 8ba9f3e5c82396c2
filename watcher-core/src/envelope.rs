//! JSON envelope exchanged with the voice platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::{
    event::{IntentEvent, Session, SkillEvent},
    speech::{Card, OutputSpeech, SkillResponse},
};

const ENVELOPE_VERSION: &str = "1.0";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEnvelope {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotEnvelope {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentEnvelope {
    pub name: Option<String>,
    #[serde(default)]
    pub slots: HashMap<String, SlotEnvelope>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RequestBody {
    #[serde(rename = "LaunchRequest", rename_all = "camelCase")]
    Launch {
        request_id: Option<String>,
        timestamp: Option<DateTime<Utc>>,
    },
    #[serde(rename = "IntentRequest", rename_all = "camelCase")]
    Intent {
        request_id: Option<String>,
        timestamp: Option<DateTime<Utc>>,
        intent: Option<IntentEnvelope>,
    },
    #[serde(rename = "SessionStartedRequest", rename_all = "camelCase")]
    SessionStarted {
        request_id: Option<String>,
        timestamp: Option<DateTime<Utc>>,
    },
    #[serde(rename = "SessionEndedRequest", rename_all = "camelCase")]
    SessionEnded {
        request_id: Option<String>,
        timestamp: Option<DateTime<Utc>>,
        reason: Option<String>,
    },
}

impl RequestBody {
    pub fn request_id(&self) -> Option<&str> {
        match self {
            RequestBody::Launch { request_id, .. }
            | RequestBody::Intent { request_id, .. }
            | RequestBody::SessionStarted { request_id, .. }
            | RequestBody::SessionEnded { request_id, .. } => request_id.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub session: SessionEnvelope,
    pub request: RequestBody,
}

impl RequestEnvelope {
    /// Build a request for `event` stamped with the current time.
    pub fn for_event(event: &SkillEvent, session: &Session, request_id: impl Into<String>) -> Self {
        let request_id = Some(request_id.into());
        let timestamp = Some(Utc::now());

        let request = match event {
            SkillEvent::SessionStarted => RequestBody::SessionStarted { request_id, timestamp },
            SkillEvent::Launch => RequestBody::Launch { request_id, timestamp },
            SkillEvent::SessionEnded { reason } => {
                RequestBody::SessionEnded { request_id, timestamp, reason: reason.clone() }
            }
            SkillEvent::Intent(intent) => RequestBody::Intent {
                request_id,
                timestamp,
                intent: Some(IntentEnvelope {
                    name: intent.name.clone(),
                    slots: intent
                        .slots
                        .iter()
                        .map(|(name, value)| {
                            (name.clone(), SlotEnvelope { name: name.clone(), value: value.clone() })
                        })
                        .collect(),
                }),
            },
        };

        Self {
            version: Some(ENVELOPE_VERSION.to_string()),
            session: SessionEnvelope {
                new: session.is_new,
                session_id: session.id.clone(),
                attributes: session
                    .attributes
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            },
            request,
        }
    }

    /// Split into the event to route and the session it belongs to.
    /// Attribute values that aren't strings are dropped.
    pub fn into_parts(self) -> (SkillEvent, Session) {
        let session = Session {
            id: self.session.session_id,
            is_new: self.session.new,
            attributes: self
                .session
                .attributes
                .into_iter()
                .filter_map(|(k, v)| match v {
                    Value::String(s) => Some((k, s)),
                    _ => None,
                })
                .collect(),
        };

        let event = match self.request {
            RequestBody::Launch { .. } => SkillEvent::Launch,
            RequestBody::SessionStarted { .. } => SkillEvent::SessionStarted,
            RequestBody::SessionEnded { reason, .. } => SkillEvent::SessionEnded { reason },
            RequestBody::Intent { intent, .. } => {
                let intent = intent
                    .map(|i| IntentEvent {
                        name: i.name,
                        slots: i.slots.into_iter().map(|(k, slot)| (k, slot.value)).collect(),
                    })
                    .unwrap_or_default();
                SkillEvent::Intent(intent)
            }
        };

        (event, session)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CardEnvelope {
    Simple { title: String, content: String },
}

impl From<&Card> for CardEnvelope {
    fn from(card: &Card) -> Self {
        CardEnvelope::Simple { title: card.title.clone(), content: card.content.clone() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepromptEnvelope {
    pub output_speech: OutputSpeech,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardEnvelope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<RepromptEnvelope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    pub session_attributes: HashMap<String, String>,
    pub response: ResponseBody,
}

impl ResponseEnvelope {
    /// Wrap a routed response (or none, for lifecycle events) with the session state to echo back.
    pub fn from_response(response: Option<&SkillResponse>, session: &Session) -> Self {
        let body = response
            .map(|r| ResponseBody {
                output_speech: Some(r.speech().clone()),
                card: r.card().map(CardEnvelope::from),
                reprompt: r.reprompt().map(|s| RepromptEnvelope { output_speech: s.clone() }),
                should_end_session: Some(r.ends_session()),
            })
            .unwrap_or_default();

        Self {
            version: ENVELOPE_VERSION.to_string(),
            session_attributes: session.attributes.clone(),
            response: body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CITY_SLOT;
    use serde_json::json;

    #[test]
    fn parses_intent_request() {
        let raw = json!({
            "version": "1.0",
            "session": {
                "new": false,
                "sessionId": "amzn1.echo-api.session.1",
                "attributes": {"City": "Leeds", "count": 3}
            },
            "request": {
                "type": "IntentRequest",
                "requestId": "req-1",
                "timestamp": "2016-05-01T10:00:00Z",
                "intent": {
                    "name": "DialogWeatherIntent",
                    "slots": {"City": {"name": "City"}}
                }
            }
        });

        let envelope: RequestEnvelope = serde_json::from_value(raw).unwrap();
        assert_eq!(envelope.request.request_id(), Some("req-1"));

        let (event, session) = envelope.into_parts();
        assert_eq!(session.id.as_deref(), Some("amzn1.echo-api.session.1"));
        assert_eq!(session.remembered_city(), Some("Leeds"));
        assert!(!session.attributes.contains_key("count"));

        let SkillEvent::Intent(intent) = event else {
            panic!("expected an intent event");
        };
        assert_eq!(intent.name.as_deref(), Some("DialogWeatherIntent"));
        assert_eq!(intent.slots.get(CITY_SLOT), Some(&None));
    }

    #[test]
    fn parses_launch_and_session_ended() {
        let launch: RequestEnvelope =
            serde_json::from_value(json!({"request": {"type": "LaunchRequest"}})).unwrap();
        assert_eq!(launch.into_parts().0, SkillEvent::Launch);

        let ended: RequestEnvelope = serde_json::from_value(json!({
            "session": {"sessionId": "s"},
            "request": {"type": "SessionEndedRequest", "reason": "USER_INITIATED"}
        }))
        .unwrap();
        assert_eq!(
            ended.into_parts().0,
            SkillEvent::SessionEnded { reason: Some("USER_INITIATED".into()) }
        );
    }

    #[test]
    fn intent_request_without_intent_has_no_name() {
        let envelope: RequestEnvelope =
            serde_json::from_value(json!({"request": {"type": "IntentRequest"}})).unwrap();
        assert_eq!(envelope.into_parts().0, SkillEvent::Intent(IntentEvent::default()));
    }

    #[test]
    fn for_event_then_into_parts_keeps_event_and_session() {
        let mut session = Session::new("s-9");
        session.set_attribute("City", "York");
        let event = SkillEvent::Intent(
            IntentEvent::new("OneShotWeatherIntent").with_slot(CITY_SLOT, Some("Bath".into())),
        );

        let envelope = RequestEnvelope::for_event(&event, &session, "req-9");
        let (parsed_event, parsed_session) = envelope.into_parts();

        assert_eq!(parsed_event, event);
        assert_eq!(parsed_session, session);
    }

    #[test]
    fn serializes_tell_with_card() {
        let response = SkillResponse::tell_with_card(
            OutputSpeech::plain("It is 5 degrees"),
            Card::new("Weather Watcher", "It is 5 degrees"),
        );
        let mut session = Session::new("s");
        session.set_attribute("City", "York");

        let value =
            serde_json::to_value(ResponseEnvelope::from_response(Some(&response), &session)).unwrap();

        assert_eq!(
            value,
            json!({
                "version": "1.0",
                "sessionAttributes": {"City": "York"},
                "response": {
                    "outputSpeech": {"type": "PlainText", "text": "It is 5 degrees"},
                    "card": {"type": "Simple", "title": "Weather Watcher", "content": "It is 5 degrees"},
                    "shouldEndSession": true
                }
            })
        );
    }

    #[test]
    fn serializes_ask_with_reprompt_and_empty_lifecycle_response() {
        let response =
            SkillResponse::ask(OutputSpeech::ssml("<speak>Hi</speak>"), OutputSpeech::plain("Which city?"));
        let value = serde_json::to_value(ResponseEnvelope::from_response(
            Some(&response),
            &Session::default(),
        ))
        .unwrap();

        assert_eq!(value["response"]["outputSpeech"]["type"], "SSML");
        assert_eq!(value["response"]["reprompt"]["outputSpeech"]["text"], "Which city?");
        assert_eq!(value["response"]["shouldEndSession"], false);

        let empty =
            serde_json::to_value(ResponseEnvelope::from_response(None, &Session::default())).unwrap();
        assert_eq!(empty["response"], json!({}));
    }
}
