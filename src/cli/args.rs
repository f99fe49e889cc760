//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate salon posters from a brand name and an offer
#[derive(Parser, Debug)]
#[command(name = "poster-studio")]
#[command(version, about = "Auto-generate salon posters in seconds", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Interactive screen: prompts for the fields, then offers share/save
    poster-studio

    # One-shot generation
    poster-studio generate -n \"Glownify Beauty Lounge\" -o \"Flat 30% off on festive makeovers\"

    # Generate and copy the poster into ~/Pictures
    poster-studio generate -n \"Glownify\" --save-to ~/Pictures

    # Check the generation server is up
    poster-studio --endpoint http://10.0.0.5:8000/generate health

ENVIRONMENT:
    POSTER_STUDIO_ENDPOINT    Generation endpoint (also read from .env)")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Generation endpoint URL (overrides env and config file)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Directory generated posters are cached in
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate one poster and print its location
    Generate {
        /// Salon / brand name (required)
        #[arg(long, short = 'n')]
        salon_name: String,

        /// Offer / tagline
        #[arg(long, short = 'o', default_value = "")]
        offer: String,

        /// Open the poster with the system share handler
        #[arg(long)]
        share: bool,

        /// Copy the poster into this directory
        #[arg(long)]
        save_to: Option<PathBuf>,

        /// Also print the poster as a base64 data URI
        #[arg(long)]
        data_uri: bool,
    },
    /// Check that the generation server is reachable
    Health,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Create a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["poster-studio"]);
        assert!(args.command.is_none());
        assert!(args.endpoint.is_none());
        assert!(args.cache_dir.is_none());
        assert!(args.config.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_args_generate_subcommand() {
        let args = Args::parse_from([
            "poster-studio",
            "generate",
            "--salon-name",
            "Glownify Beauty Lounge",
            "--offer",
            "Flat 30% off on festive makeovers",
        ]);
        match args.command {
            Some(Command::Generate {
                salon_name,
                offer,
                share,
                save_to,
                data_uri,
            }) => {
                assert_eq!(salon_name, "Glownify Beauty Lounge");
                assert_eq!(offer, "Flat 30% off on festive makeovers");
                assert!(!share);
                assert!(save_to.is_none());
                assert!(!data_uri);
            }
            other => panic!("Expected Generate, got {:?}", other),
        }
    }

    #[test]
    fn test_args_generate_offer_defaults_to_empty() {
        let args = Args::parse_from(["poster-studio", "generate", "-n", "Glownify"]);
        match args.command {
            Some(Command::Generate { offer, .. }) => assert_eq!(offer, ""),
            other => panic!("Expected Generate, got {:?}", other),
        }
    }

    #[test]
    fn test_args_generate_requires_salon_name() {
        let result = Args::try_parse_from(["poster-studio", "generate"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_args_generate_share_flags() {
        let args = Args::parse_from([
            "poster-studio",
            "generate",
            "-n",
            "Glownify",
            "--share",
            "--save-to",
            "/tmp/saved",
            "--data-uri",
        ]);
        match args.command {
            Some(Command::Generate {
                share,
                save_to,
                data_uri,
                ..
            }) => {
                assert!(share);
                assert_eq!(save_to, Some(PathBuf::from("/tmp/saved")));
                assert!(data_uri);
            }
            other => panic!("Expected Generate, got {:?}", other),
        }
    }

    #[test]
    fn test_args_global_flags_after_subcommand() {
        let args = Args::parse_from([
            "poster-studio",
            "health",
            "--endpoint",
            "http://10.0.0.5:8000/generate",
            "-v",
        ]);
        assert!(matches!(args.command, Some(Command::Health)));
        assert_eq!(
            args.endpoint.as_deref(),
            Some("http://10.0.0.5:8000/generate")
        );
        assert!(args.verbose);
    }

    #[test]
    fn test_args_config_option() {
        let args = Args::parse_from(["poster-studio", "--config", "/tmp/config.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/config.toml")));

        let args = Args::parse_from(["poster-studio", "-c", "/tmp/test.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/test.toml")));
    }

    #[test]
    fn test_args_config_subcommands() {
        let args = Args::parse_from(["poster-studio", "config", "show"]);
        assert!(matches!(
            args.command,
            Some(Command::Config {
                action: ConfigAction::Show
            })
        ));

        let args = Args::parse_from(["poster-studio", "config", "init", "--force"]);
        assert!(matches!(
            args.command,
            Some(Command::Config {
                action: ConfigAction::Init { force: true }
            })
        ));

        let args = Args::parse_from(["poster-studio", "config", "path"]);
        assert!(matches!(
            args.command,
            Some(Command::Config {
                action: ConfigAction::Path
            })
        ));
    }
}
