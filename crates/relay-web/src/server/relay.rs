use leptos::prelude::*;
use leptos::server_fn::error::NoCustomError;
use serde::{Deserialize, Serialize};

use relay_types::DisplayOptions;

/// The only failure text the browser ever sees. Details stay in the server log.
pub const GENERIC_ERROR: &str = "Something went wrong while generating a response.";

/// Wire form of one submission's outcome.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Warning(String),
    Generated(String),
}

#[cfg(feature = "ssr")]
impl From<relay_core::Outcome> for Reply {
    fn from(outcome: relay_core::Outcome) -> Self {
        match outcome {
            relay_core::Outcome::Warning(text) => Reply::Warning(text),
            relay_core::Outcome::Generated(text) => Reply::Generated(text),
        }
    }
}

#[cfg(feature = "ssr")]
fn relay() -> Result<std::sync::Arc<relay_core::PromptRelay>, ServerFnError<NoCustomError>> {
    use_context::<std::sync::Arc<relay_core::PromptRelay>>().ok_or_else(|| {
        ServerFnError::<NoCustomError>::ServerError("Prompt relay is not configured".into())
    })
}

#[server]
pub async fn load_display_options() -> Result<DisplayOptions, ServerFnError<NoCustomError>> {
    Ok(relay()?.display().clone())
}

#[server]
pub async fn submit_prompt(prompt: String) -> Result<Reply, ServerFnError<NoCustomError>> {
    use tracing::{error, info};

    let relay = relay()?;
    let outcome = relay.submit(&prompt).await.map_err(|e| {
        error!(error = %e, retryable = e.is_retryable(), "generation failed");
        ServerFnError::<NoCustomError>::ServerError(GENERIC_ERROR.into())
    })?;

    info!(generated = outcome.is_generated(), "prompt handled");
    Ok(outcome.into())
}
