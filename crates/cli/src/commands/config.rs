use std::path::Path;

use anyhow::Result;
use snapshelf_core::{config, StoreConfig};

pub fn run(store_config: &StoreConfig, custom_path: Option<&Path>) -> Result<()> {
    let source = match custom_path {
        Some(path) => path.display().to_string(),
        None => match config::default_config_path() {
            Some(path) if path.exists() => path.display().to_string(),
            _ => "built-in defaults".to_string(),
        },
    };

    let root = store_config.storage_root.resolve()?;
    println!("Config:        {source}");
    println!("Storage root:  {} ({})", store_config.storage_root, root.display());
    println!("Image dir:     {}", store_config.image_dir);
    println!("Photos in:     {}", root.join(&store_config.image_dir).display());
    Ok(())
}
