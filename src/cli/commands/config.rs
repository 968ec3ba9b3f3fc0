//! Config command implementation.

use crate::cli::preflight::required_key_vars;
use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::PathBuf;

/// Run the config command.
pub fn run_config(action: &ConfigAction, config_path: Option<PathBuf>, settings: Settings) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Settings::default_config_path);

    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);

            Output::header("Effective setup");
            Output::kv("Config file", &describe_file(&config_path));
            Output::kv("Outlet database", &describe_file(&settings.sqlite_path()));
            Output::kv("Fallback", &settings.query.fallback.to_string());
            for var in required_key_vars(&settings) {
                let state = match std::env::var(var) {
                    Ok(key) if !key.trim().is_empty() => "set",
                    _ => "missing",
                };
                Output::kv(var, state);
            }
            if let Err(e) = settings.validate() {
                Output::warning(&format!("{}", e));
            }
        }

        ConfigAction::Edit => {
            // Create default config if it doesn't exist
            if !config_path.exists() {
                settings.save_to(&config_path)?;
                Output::info(&format!("Created default config at {}", config_path.display()));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
            Output::info(&format!("Opening config in {}...", editor));

            match std::process::Command::new(&editor).arg(&config_path).status() {
                Ok(s) if s.success() => {
                    // Surface problems now rather than on the next question
                    match Settings::load_from(Some(&config_path)).and_then(|s| s.validate()) {
                        Ok(()) => Output::success("Config saved."),
                        Err(e) => Output::warning(&format!("Config is not usable yet: {}", e)),
                    }
                }
                Ok(_) => Output::warning("Editor exited with non-zero status."),
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {}", config_path.display()));
                }
            }
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Path plus whether it exists yet.
fn describe_file(path: &std::path::Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not created yet)", path.display())
    }
}
