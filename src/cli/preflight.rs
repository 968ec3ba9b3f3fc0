//! Pre-flight checks before operations that may call hosted services.
//!
//! Resolver answers never reach a hosted service, so a missing key is only
//! fatal for the questions that fall back to generation. Callers report these
//! problems as warnings and let the failing request surface the error.

use crate::config::{FallbackStrategy, Settings};
use crate::error::{OutpostError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Answering one question from the CLI.
    Ask,
    /// Serving `/chat-completion`.
    Serve,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Ask | Operation::Serve => {
            for var in required_key_vars(settings) {
                check_api_key(var)?;
            }
        }
    }
    Ok(())
}

/// API key variables the configured fallback needs.
///
/// Generation always completes; only the retrieval strategy embeds.
pub fn required_key_vars(settings: &Settings) -> Vec<&str> {
    let mut vars = vec![settings.completion.api_key_env.as_str()];
    if settings.query.fallback == FallbackStrategy::Retrieval
        && settings.embedding.api_key_env != settings.completion.api_key_env
    {
        vars.push(settings.embedding.api_key_env.as_str());
    }
    vars
}

/// Check that the API key environment variable is set and non-empty.
fn check_api_key(var: &str) -> Result<()> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(()),
        Ok(_) => Err(OutpostError::Config(format!(
            "{} is empty. Set it with: export {}='...'",
            var, var
        ))),
        Err(_) => Err(OutpostError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            var, var
        ))),
    }
}
