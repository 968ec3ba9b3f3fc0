//! CLI module for Outpost.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Outpost - Outlet Query Resolution
///
/// Ask questions about outlets, find outlets near you, and serve both over HTTP.
#[derive(Parser, Debug)]
#[command(name = "outpost")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "OUTPOST_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a question about the outlets
    Ask {
        /// The question to ask
        question: String,
    },

    /// List outlets near a point, nearest first
    Nearby {
        /// Latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,

        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,

        /// Search radius in kilometres (defaults to query.default_radius_km)
        #[arg(short, long)]
        distance_km: Option<f64>,
    },

    /// List stored outlets
    List,

    /// Import outlet records from a JSON array, replacing records with the same id
    Import {
        /// Path to the JSON file
        file: String,
    },

    /// Start HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nearby_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "outpost",
            "nearby",
            "--latitude",
            "-6.2",
            "--longitude",
            "106.8",
        ])
        .unwrap();
        match cli.command {
            Commands::Nearby {
                latitude,
                longitude,
                distance_km,
            } => {
                assert_eq!(latitude, -6.2);
                assert_eq!(longitude, 106.8);
                assert_eq!(distance_km, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["outpost", "list", "-vv", "--config", "/tmp/o.toml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config.as_deref(), Some("/tmp/o.toml"));
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["outpost", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 8000);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
