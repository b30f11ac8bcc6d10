use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::app::AppContext;
use crate::config::AppConfig;
use crate::session::FileStore;

/// Directory holding `session.json`; created on first use
pub fn get_config_dir(config: &AppConfig) -> anyhow::Result<PathBuf> {
    let config_dir = match &config.storage.config_dir {
        Some(custom_dir) => custom_dir.clone(),
        None => {
            let home = std::env::var("HOME")
                .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
            PathBuf::from(home).join(".config").join("smart-credit")
        }
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn session_file(config: &AppConfig) -> anyhow::Result<PathBuf> {
    Ok(get_config_dir(config)?.join("session.json"))
}

/// Application context backed by the on-disk session file. With
/// `preload_catalog` the catalog fetch starts right away in the background.
pub fn build_context(config: AppConfig, preload_catalog: bool) -> anyhow::Result<AppContext> {
    let store = Arc::new(FileStore::new(session_file(&config)?));
    let ctx = AppContext::new(config, store)?;
    if preload_catalog {
        ctx.start();
    }
    Ok(ctx)
}
