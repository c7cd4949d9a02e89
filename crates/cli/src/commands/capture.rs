use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use snapshelf_core::{capture_and_save, CaptureOptions, FileCamera, Platform, PhotoStore};

pub fn run(store: &mut PhotoStore, image: PathBuf, quality: u8, web: bool) -> Result<()> {
    let mut camera = FileCamera::temporary(image)?;
    let options = CaptureOptions {
        quality,
        ..CaptureOptions::default()
    };
    let platform = if web { Platform::Web } else { Platform::Hybrid };

    let name = capture_and_save(store, &mut camera, &options, platform)
        .with_context(|| format!("Failed to capture {}", camera.source().display()))?;

    println!("Saved {name} ({} photos stored)", store.photos().len());
    Ok(())
}

pub fn save(store: &mut PhotoStore, file: &Path) -> Result<()> {
    let bytes =
        fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let name = store.save(&bytes)?;
    println!("Saved {name} ({} photos stored)", store.photos().len());
    Ok(())
}
