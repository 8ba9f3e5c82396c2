use thiserror::Error;

/// Spoken when the weather provider can't be reached or returns something unusable.
pub const PROVIDER_APOLOGY: &str =
    "Sorry, the Open Weather Map service is experiencing a problem. Please try again later.";

/// Spoken when the provider URL can't even be formed from configuration.
pub const SKILL_APOLOGY: &str =
    "Sorry, there is a problem with Weather Watcher. Please try again later.";

/// Request-level failures that escape the router.
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("Invalid intent: {}", .0.as_deref().unwrap_or("<missing>"))]
    InvalidIntent(Option<String>),
}

/// Failures while talking to the weather provider. Never leave the resolver.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("could not build provider URL: {0}")]
    InvalidEndpoint(String),

    #[error("weather provider unavailable: {0}")]
    Unavailable(String),

    #[error("weather provider returned an empty body")]
    EmptyBody,

    #[error("malformed weather provider response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ProviderError {
    /// Text rendered to the user in place of a weather report.
    pub fn apology(&self) -> &'static str {
        match self {
            ProviderError::InvalidEndpoint(_) => SKILL_APOLOGY,
            ProviderError::Unavailable(_)
            | ProviderError::EmptyBody
            | ProviderError::Malformed(_) => PROVIDER_APOLOGY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_intent_names_the_intent() {
        let err = SkillError::InvalidIntent(Some("UnknownIntent".into()));
        assert_eq!(err.to_string(), "Invalid intent: UnknownIntent");

        let err = SkillError::InvalidIntent(None);
        assert_eq!(err.to_string(), "Invalid intent: <missing>");
    }

    #[test]
    fn only_endpoint_errors_use_the_skill_apology() {
        assert_eq!(ProviderError::InvalidEndpoint("x".into()).apology(), SKILL_APOLOGY);
        assert_eq!(ProviderError::Unavailable("timeout".into()).apology(), PROVIDER_APOLOGY);
        assert_eq!(ProviderError::EmptyBody.apology(), PROVIDER_APOLOGY);

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ProviderError::from(json_err).apology(), PROVIDER_APOLOGY);
    }
}
