use clap::{Arg, ArgAction, Command};
use hintsh::command_router::CommandRouter;
use hintsh::config::Config;
use hintsh::model::{CompletionBackend, GeminiBackend, ModelAccess, OfflineBackend};
use hintsh::shell::Shell;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("HINTSH_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("hintsh")
        .about("Interactive shell with natural-language assistance")
        .long_about(
            "hintsh runs ordinary shell commands and adds ?questions, !explain, !git and !find helpers, \
             plus fix suggestions when a command fails",
        )
        .arg(
            Arg::new("command")
                .short('c')
                .long("command")
                .help("Handle a single input line and exit")
                .value_name("LINE")
                .num_args(1),
        )
        .arg(
            Arg::new("set-api-key")
                .long("set-api-key")
                .help("Set the Gemini API key")
                .value_name("API_KEY")
                .num_args(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Show configuration information")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("offline")
                .long("offline")
                .help("Never contact the model; use deterministic fallbacks only")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    // Handle configuration commands
    if let Some(api_key) = matches.get_one::<String>("set-api-key") {
        let mut config = Config::load_persisted()?;
        config.set_api_key(api_key.clone())?;
        println!("✅ API key saved successfully");
        return Ok(());
    }

    if matches.get_flag("config") {
        Config::show_config_info()?;
        return Ok(());
    }

    let mut config = Config::load()?;
    if matches.get_flag("offline") {
        config.offline = true;
    } else {
        config = Config::load_or_bootstrap()?;
    }

    let backend: Box<dyn CompletionBackend> = match config.credential() {
        Some(credential) if !config.is_offline() => Box::new(GeminiBackend::new(credential)),
        _ => {
            info!("Running in offline mode");
            Box::new(OfflineBackend)
        }
    };
    let model = Arc::new(ModelAccess::new(backend, config.model_spec()));
    let router = CommandRouter::new(model);

    if let Some(line) = matches.get_one::<String>("command") {
        Shell::new(router, None).handle_line(line).await;
        return Ok(());
    }

    Shell::new(router, Config::history_path().ok()).run().await
}
