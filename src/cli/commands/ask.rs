//! Ask command implementation.

use crate::answer::AnswerKind;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::QueryEngine;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(question: &str, settings: Settings) -> Result<()> {
    // Counting and latest-closing questions need no key
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::warning(&format!("{}", e));
        Output::warning("Questions that need a generated answer will fail.");
    }

    let engine = QueryEngine::new(settings)?;

    let spinner = Output::spinner("Looking up outlets...");

    match engine.resolve_query(question).await {
        Ok(answer) => {
            spinner.finish_and_clear();

            println!("\n{}\n", answer);
            if answer.kind == AnswerKind::Unavailable {
                Output::warning("No answer could be produced from the outlet data.");
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
