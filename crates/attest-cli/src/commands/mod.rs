//! Command implementations.

pub mod config;
pub mod dedup;
pub mod evaluate;
pub mod extract;

pub use self::config::execute_config;
pub use self::dedup::execute_dedup;
pub use self::evaluate::execute_evaluate;
pub use self::extract::execute_extract;

use crate::cli::InputArgs;
use crate::error::{CliError, Result};
use attest_domain::{ClaimGenerator, ClaimJudge};
use attest_llm::{OllamaProvider, OpenAiProvider};
use attest_pipeline::{LlmSettings, ProviderKind};
use std::fs;
use std::io::{self, Read};
use std::sync::Arc;

/// One backend seen as both capabilities.
pub struct LlmHandles {
    /// Extraction capability
    pub generator: Arc<dyn ClaimGenerator>,
    /// Containment and classification capability
    pub judge: Arc<dyn ClaimJudge>,
}

impl LlmHandles {
    fn from_provider<P: ClaimJudge + 'static>(provider: P) -> Self {
        let provider = Arc::new(provider);
        Self {
            generator: provider.clone(),
            judge: provider,
        }
    }
}

/// Build the configured backend; `None` when no provider is configured.
pub fn build_llm(settings: &LlmSettings) -> Result<Option<LlmHandles>> {
    let handles = match settings.provider {
        ProviderKind::None => return Ok(None),
        ProviderKind::Ollama => {
            let mut provider = match &settings.endpoint {
                Some(endpoint) => OllamaProvider::new(endpoint.as_str(), settings.model.as_str()),
                None => OllamaProvider::default_endpoint(settings.model.as_str()),
            };
            if let Some(temperature) = settings.temperature {
                provider = provider.with_temperature(temperature);
            }
            LlmHandles::from_provider(provider)
        }
        ProviderKind::OpenAi => {
            let mut provider = OpenAiProvider::from_env(&settings.api_key_env, settings.model.as_str())?;
            if let Some(endpoint) = &settings.endpoint {
                provider = provider.with_base_url(endpoint.as_str());
            }
            if let Some(temperature) = settings.temperature {
                provider = provider.with_temperature(temperature);
            }
            LlmHandles::from_provider(provider)
        }
    };

    tracing::info!("Using {:?} backend with model {}", settings.provider, settings.model);
    Ok(Some(handles))
}

/// Response text from the argument, a file, or stdin.
pub fn read_input(input: &InputArgs) -> Result<String> {
    let text = if let Some(text) = &input.text {
        text.clone()
    } else if let Some(path) = &input.file {
        fs::read_to_string(path)?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    if text.trim().is_empty() {
        return Err(CliError::InvalidInput("Response text is empty".to_string()));
    }
    Ok(text)
}
