mod cli;
mod logger;

use clap::Parser;
use cli::{Args, Command};
use poster_studio::config::{Config, Overrides, PosterConfig};
use poster_studio::session::PosterSession;
use poster_studio::share::{ShareTarget, SystemShare};

/// Load the config file.
///
/// An explicit `--config` path must exist; the default path falls back to
/// built-in settings with a warning if it cannot be read.
fn load_config(path: Option<&std::path::Path>) -> Result<Config, String> {
    match path {
        Some(path) => Config::load_from(path).map_err(|e| e.to_string()),
        None => match Config::load() {
            Ok(config) => Ok(config),
            Err(e) => {
                eprintln!("Warning: Failed to load config file: {}", e);
                eprintln!("Using default settings.\n");
                Ok(Config::default())
            }
        },
    }
}

/// Run the interactive poster screen on stdin/stdout.
fn run_interactive(config: &Config, poster_config: &PosterConfig) -> Result<(), String> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to create async runtime: {}", e))?;

    rt.block_on(async {
        let mut session = PosterSession::from_config(poster_config)
            .map_err(|e| format!("Failed to create poster client: {}", e))?;
        let share_target = SystemShare::new();

        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();

        cli::run_screen(
            &mut session,
            &share_target,
            config.save_dir(),
            &mut input,
            &mut output,
        )
        .await
        .map_err(|e| format!("Terminal I/O failed: {}", e))
    })
}

fn run(args: Args) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let overrides = Overrides {
        endpoint: args.endpoint.clone(),
        cache_dir: args.cache_dir.clone(),
    };
    let poster_config = config
        .resolve_from_env(&overrides)
        .map_err(|e| e.to_string())?;
    log::debug!("Resolved configuration: {:?}", poster_config);

    match args.command {
        None => run_interactive(&config, &poster_config),
        Some(Command::Generate {
            salon_name,
            offer,
            share,
            save_to,
            data_uri,
        }) => {
            let system_share = SystemShare::new();
            let share_target = share.then_some(&system_share as &dyn ShareTarget);
            cli::run_generate(
                &poster_config,
                &salon_name,
                &offer,
                share_target,
                save_to,
                data_uri,
            )
        }
        Some(Command::Health) => cli::run_health(&poster_config),
        Some(Command::Config { action }) => cli::handle_config_action(
            action,
            args.config.as_deref(),
            &config,
            &poster_config,
        ),
    }
}

fn main() {
    // Load .env file, don't override existing env vars.
    // dotenv::dotenv() returns Err if .env doesn't exist, which is fine
    let _ = dotenv::dotenv();

    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
