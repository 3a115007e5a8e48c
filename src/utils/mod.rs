pub mod build_info;
pub mod persistence;

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use dirs::home_dir;

const DEFAULT_DIR_NAME: &str = ".bittrip";
const CONFIG_FILE: &str = "config.json";

/// Installs the global tracing subscriber, logging to stderr.
///
/// `RUST_LOG` directives are honoured; `bittrip_core=info` is added on top.
/// Call through [`crate::init`], which guards against repeated setup.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "bittrip_core=info".parse() {
        filter = filter.add_directive(directive);
    }

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Returns the application data directory, defaulting to `~/.bittrip`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("BITTRIP_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
