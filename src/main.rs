/// Bundled defaults for builds without a .env file (mobile, web)
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

#[cfg(not(target_arch = "wasm32"))]
fn load_dotenv() {
    // .env (desktop dev) first; bundled values only fill what it left unset.
    let _ = dotenvy::dotenv();
    load_bundled_config();
}

#[cfg(target_arch = "wasm32")]
fn load_dotenv() {
    load_bundled_config();
}

fn load_bundled_config() {
    for line in BUNDLED_CONFIG.lines() {
        let line = line.trim();
        // Skip comments and empty lines
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        // Parse KEY=VALUE
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim();
            // Only set if not already set (allow env override)
            if std::env::var(key).is_err() {
                // SAFETY: We're setting env vars at startup before any threads are spawned
                unsafe {
                    std::env::set_var(key, value);
                }
            }
        }
    }
}

fn main() {
    load_dotenv();

    let config = match diagnoai::config::ClientConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid DiagnoAI configuration: {err:#}");
            std::process::exit(2);
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_target(false)
        .try_init();
    tracing::info!(api = %config.api_base, locale = config.locale.as_str(), "starting DiagnoAI");

    dioxus::LaunchBuilder::new()
        .with_context(config)
        .launch(diagnoai::ui::App);
}
