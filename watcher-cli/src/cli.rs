use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::debug;
use watcher_core::{
    Config, IntentEvent, IntentName, IntentRouter, OutputSpeech, RequestEnvelope, Session,
    SkillEvent, SkillResponse, WeatherResolver, event::CITY_SLOT, provider_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-watcher", version, about = "Weather Watcher voice skill")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the provider timeout, in seconds.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the OpenWeatherMap endpoint and API key.
    Configure,

    /// One-shot question: current weather for a city.
    Ask {
        /// City name, e.g. "Newcastle upon Tyne".
        city: String,
    },

    /// Talk to the skill turn by turn, as a voice device would.
    Chat,

    /// Answer one platform request envelope (JSON) and print the response envelope.
    Handle {
        /// Read the request from this file instead of stdin.
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match &self.command {
            Command::Configure => self.configure(),
            Command::Ask { city } => self.ask(city).await,
            Command::Chat => self.chat().await,
            Command::Handle { file } => self.handle(file.as_deref()).await,
        }
    }

    fn load_config(&self) -> Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        if let Some(secs) = self.timeout_secs {
            cfg.provider.timeout_secs = secs;
        }
        Ok(cfg)
    }

    fn build_router(&self) -> Result<IntentRouter> {
        let cfg = self.load_config()?;
        cfg.provider.validate()?;
        let provider = provider_from_config(&cfg.provider)?;
        Ok(IntentRouter::new(WeatherResolver::new(provider)))
    }

    fn configure(&self) -> Result<()> {
        let mut cfg = self.load_config()?;

        cfg.provider.endpoint = Text::new("OpenWeatherMap endpoint:")
            .with_default(&cfg.provider.endpoint)
            .prompt()?;

        let api_key = Password::new("API key:")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()?;
        cfg.set_api_key(api_key.trim());
        cfg.provider.validate()?;

        let path = match &self.config {
            Some(path) => {
                cfg.save_to(path)?;
                path.clone()
            }
            None => cfg.save()?,
        };
        println!("Saved configuration to {}", path.display());

        Ok(())
    }

    async fn ask(&self, city: &str) -> Result<()> {
        let router = self.build_router()?;
        let mut session = new_session();

        let intent = IntentEvent::new(IntentName::OneShotWeather.as_str())
            .with_slot(CITY_SLOT, Some(city.to_string()));
        let response = router.on_intent(&intent, &mut session).await?;
        print_response(&response);

        Ok(())
    }

    async fn chat(&self) -> Result<()> {
        let router = self.build_router()?;
        let mut session = new_session();

        router.dispatch(&SkillEvent::SessionStarted, &mut session).await?;
        print_response(&router.on_launch(&session));
        session.is_new = false;

        let reason = loop {
            let line = match Text::new("You:").prompt() {
                Ok(line) => line,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    break "USER_INITIATED";
                }
                Err(err) => return Err(err.into()),
            };

            match router.on_intent(&utterance_to_intent(&line), &mut session).await {
                Ok(response) => {
                    print_response(&response);
                    if response.ends_session() {
                        break "SESSION_COMPLETED";
                    }
                }
                Err(err) => println!("Weather Watcher didn't understand that ({err})."),
            }
        };

        router
            .dispatch(&SkillEvent::SessionEnded { reason: Some(reason.to_string()) }, &mut session)
            .await?;

        Ok(())
    }

    async fn handle(&self, file: Option<&std::path::Path>) -> Result<()> {
        let raw = match file {
            Some(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read request file: {}", path.display()))?,
            None => {
                let mut buf = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut buf)
                    .await
                    .context("Failed to read request from stdin")?;
                buf
            }
        };

        let envelope: RequestEnvelope =
            serde_json::from_str(&raw).context("Failed to parse request envelope JSON")?;
        debug!(?envelope, "parsed request envelope");

        let router = self.build_router()?;
        let response = router.handle_envelope(envelope).await?;

        println!(
            "{}",
            serde_json::to_string_pretty(&response).context("Failed to serialize response")?
        );

        Ok(())
    }
}

fn new_session() -> Session {
    Session::new(format!("cli-{}", Utc::now().timestamp_millis()))
}

/// Map what the user typed in `chat` onto the intent a voice model would produce.
fn utterance_to_intent(line: &str) -> IntentEvent {
    let text = line.trim();

    let builtin = match text.to_lowercase().as_str() {
        "help" => Some(IntentName::Help),
        "stop" => Some(IntentName::Stop),
        "cancel" => Some(IntentName::Cancel),
        _ => None,
    };

    match builtin {
        Some(name) => IntentEvent::new(name.as_str()),
        None if text.is_empty() => IntentEvent::new(IntentName::DialogWeather.as_str()),
        None => IntentEvent::new(IntentName::DialogWeather.as_str())
            .with_slot(CITY_SLOT, Some(text.to_string())),
    }
}

fn speakable(speech: &OutputSpeech) -> String {
    match speech {
        OutputSpeech::PlainText { text } => text.clone(),
        OutputSpeech::Ssml { ssml } => ssml.replace("<speak>", "").replace("</speak>", ""),
    }
}

fn print_response(response: &SkillResponse) {
    println!("Weather Watcher: {}", speakable(response.speech()));
    if let Some(card) = response.card() {
        println!("[{}] {}", card.title, card.content);
    }
}
