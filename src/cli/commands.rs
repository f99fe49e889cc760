//! Subcommand handlers for generate, health and config actions.

use std::io::Write;
use std::path::{Path, PathBuf};

use poster_studio::config::{default_path, expand_tilde, Config, PosterConfig};
use poster_studio::poster::PosterClient;
use poster_studio::session::{Notice, PosterSession};
use poster_studio::share::{SaveToDirectory, ShareTarget};

use super::args::ConfigAction;

/// Template written by `config init`.
const DEFAULT_CONFIG: &str = r#"# poster-studio configuration

[endpoint]
# Poster generation endpoint (POST, multipart form with salonName and offer)
# url = "http://127.0.0.1:8000/generate"
# Request timeout in seconds (default: no timeout)
# timeout_secs = 60

[cache]
# Where generated posters are written (default: OS cache dir)
# dir = "/tmp/poster-studio"

[share]
# Default directory for the save action; it must already exist
# save_dir = "~/Pictures"
"#;

fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Runtime::new().map_err(|e| format!("Failed to create async runtime: {}", e))
}

/// Generate one poster, then optionally save, share and print it.
pub fn run_generate(
    poster_config: &PosterConfig,
    salon_name: &str,
    offer: &str,
    share_target: Option<&dyn ShareTarget>,
    save_to: Option<PathBuf>,
    data_uri: bool,
) -> Result<(), String> {
    let stdout = std::io::stdout();
    let mut output = stdout.lock();
    run_generate_to(
        poster_config,
        salon_name,
        offer,
        share_target,
        save_to,
        data_uri,
        &mut output,
    )
}

fn write_err(e: std::io::Error) -> String {
    format!("Failed to write output: {}", e)
}

/// [`run_generate`] writing its progress to `output`.
///
/// Order is fixed: print the data URI, save, then share.
fn run_generate_to<W: Write>(
    poster_config: &PosterConfig,
    salon_name: &str,
    offer: &str,
    share_target: Option<&dyn ShareTarget>,
    save_to: Option<PathBuf>,
    data_uri: bool,
    output: &mut W,
) -> Result<(), String> {
    let rt = runtime()?;

    rt.block_on(async {
        let mut session = PosterSession::from_config(poster_config)
            .map_err(|e| format!("Failed to create poster client: {}", e))?;
        session.set_salon_name(salon_name);
        session.set_offer(offer);

        write!(output, "Generating poster via {}... ", poster_config.endpoint).map_err(write_err)?;
        output.flush().ok();

        let poster = match session.generate().await {
            Ok(poster) => poster.clone(),
            Err(e) => {
                writeln!(output, "failed").map_err(write_err)?;
                return Err(Notice::from(&e).to_string());
            }
        };
        writeln!(output, "done").map_err(write_err)?;
        writeln!(output, "Generated Poster: {}", poster.path().display()).map_err(write_err)?;

        if data_uri {
            let uri = poster.data_uri().await.map_err(|e| e.to_string())?;
            writeln!(output, "{}", uri).map_err(write_err)?;
        }

        if let Some(dir) = save_to {
            let target = SaveToDirectory::new(expand_tilde(&dir));
            let dest = target
                .save(poster.path())
                .map_err(|e| Notice::from(&e).to_string())?;
            writeln!(output, "Saved to: {}", dest.display()).map_err(write_err)?;
        }

        if let Some(target) = share_target {
            session
                .share(target)
                .map_err(|e| Notice::from(&e).to_string())?;
            writeln!(output, "Shared via {}", target.name()).map_err(write_err)?;
        }

        Ok(())
    })
}

/// Check the generation server.
pub fn run_health(poster_config: &PosterConfig) -> Result<(), String> {
    let rt = runtime()?;

    rt.block_on(async {
        let client = PosterClient::new(poster_config)
            .map_err(|e| format!("Failed to create poster client: {}", e))?;
        let url = client.health_url().map_err(|e| e.to_string())?;

        let health = client
            .check_health()
            .await
            .map_err(|e| format!("Server at {} is unreachable: {}", url, e))?;

        println!("Server at {}: {}", url, health.status);
        if health.is_ok() {
            Ok(())
        } else {
            Err(format!("Server reported status '{}'", health.status))
        }
    })
}

/// Handle config subcommand actions.
pub fn handle_config_action(
    action: ConfigAction,
    config_path: Option<&Path>,
    config: &Config,
    resolved: &PosterConfig,
) -> Result<(), String> {
    let path = config_path.map(Path::to_path_buf).unwrap_or_else(default_path);

    match action {
        ConfigAction::Show => {
            println!("Current configuration:");
            println!("  Endpoint: {}", resolved.endpoint);
            match resolved.timeout {
                Some(timeout) => println!("  Timeout: {}s", timeout.as_secs()),
                None => println!("  Timeout: none"),
            }
            println!("  Cache dir: {}", resolved.cache_dir.display());
            match config.save_dir() {
                Some(dir) => println!("  Save dir: {}", dir.display()),
                None => println!("  Save dir: (not set)"),
            }
            println!();

            if path.exists() {
                println!("Config file: {} (exists)", path.display());
            } else {
                println!("Config file: {} (not found)", path.display());
            }
            Ok(())
        }
        ConfigAction::Init { force } => write_default_config(&path, force).map(|()| {
            println!("Created config file: {}", path.display());
        }),
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

/// Write the default config template to `path`.
fn write_default_config(path: &Path, force: bool) -> Result<(), String> {
    if path.exists() && !force {
        return Err(format!(
            "Config file already exists: {}\nUse 'poster-studio config init --force' to overwrite it.",
            path.display()
        ));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Error creating config directory: {}", e))?;
    }

    std::fs::write(path, DEFAULT_CONFIG).map_err(|e| format!("Error writing config file: {}", e))
}
