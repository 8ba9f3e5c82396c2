//! Core library for the Weather Watcher voice skill.
//!
//! This crate defines:
//! - Configuration for the weather provider
//! - Routing of platform intents to responses, including the city dialog
//! - Weather lookup against OpenWeatherMap and the spoken report
//! - The platform's JSON envelope
//!
//! It is used by `watcher-cli`, but can also be embedded in a serverless handler.

pub mod config;
pub mod envelope;
pub mod error;
pub mod event;
pub mod model;
pub mod provider;
pub mod resolver;
pub mod router;
pub mod speech;

pub use config::{Config, ProviderConfig};
pub use envelope::{RequestEnvelope, ResponseEnvelope};
pub use error::{ProviderError, SkillError};
pub use event::{IntentEvent, IntentName, Session, SkillEvent};
pub use model::{WeatherQuery, WeatherResult};
pub use provider::{OpenWeatherProvider, WeatherProvider, provider_from_config};
pub use resolver::WeatherResolver;
pub use router::IntentRouter;
pub use speech::{Card, OutputSpeech, SkillResponse};
