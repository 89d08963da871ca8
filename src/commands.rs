//! Headless subcommands: move the dataset in and out without the editor.

use crate::bridge::{export_payload, parse_import};
use crate::cli::AppConfig;
use crate::state::ScenarioStore;
use crate::storage::{FileStorage, KeyValueStorage};
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

fn open_store(config: &AppConfig) -> ScenarioStore<FileStorage> {
    ScenarioStore::load(FileStorage::new(&config.data_dir), config.storage_key.clone())
}

pub fn export(config: &AppConfig, output: Option<&Path>) -> Result<()> {
    let store = open_store(config);
    let payload = export_payload(store.scenarios())?;
    match output {
        Some(path) => {
            std::fs::write(path, &payload)
                .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            info!("Exported {} scenarios to {}", store.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(payload.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

pub fn import(config: &AppConfig, file: &Path) -> Result<()> {
    let text = if file == Path::new("-") {
        let mut s = String::new();
        std::io::stdin().read_to_string(&mut s)?;
        s
    } else {
        std::fs::read_to_string(file)
            .wrap_err_with(|| format!("Failed to read {}", file.display()))?
    };

    let scenarios = parse_import(&text).wrap_err("Invalid data format")?;
    let mut store = open_store(config);
    store.replace_all(scenarios);
    info!("Imported {} scenarios", store.len());
    Ok(())
}

pub fn reset(config: &AppConfig) -> Result<()> {
    let mut storage = FileStorage::new(&config.data_dir);
    storage.remove_item(&config.storage_key)?;
    info!("Removed persisted data under '{}'", config.storage_key);
    Ok(())
}

pub fn storage_path(config: &AppConfig) -> Result<PathBuf> {
    Ok(FileStorage::new(&config.data_dir).path_for(&config.storage_key)?)
}
