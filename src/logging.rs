use anyhow::Context;
use std::path::Path;

/// Send log messages to the file at `path`, since the terminal belongs to the
/// game.  The level filter is taken from `RUST_LOG`, defaulting to `info`.
pub(crate) fn init(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }
    let file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("failed to install logger")?;
    Ok(())
}
