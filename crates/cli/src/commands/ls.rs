use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use snapshelf_core::{LoadProgress, PhotoStore, StoredPhoto};

pub fn run(store: &mut PhotoStore, json: bool) -> Result<()> {
    if json {
        let photos = store.list_all()?;
        println!("{}", serde_json::to_string_pretty(photos)?);
        return Ok(());
    }

    let image_dir = store.image_dir().to_string();
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let photos = store.list_all_with_progress(Some(&mut |progress| match progress {
        LoadProgress::Start { total } => {
            pb.set_length(total as u64);
            pb.set_position(0);
            pb.set_message("Loading photos...");
        }
        LoadProgress::Loaded { name } => {
            pb.inc(1);
            pb.set_message(name);
        }
        LoadProgress::Complete { .. } => {
            pb.finish_and_clear();
        }
    }))?;

    if photos.is_empty() {
        println!("No photos stored. Use `snapshelf capture <image>` to add one.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("Name"), Cell::new("Captured"), Cell::new("Size")]);

    let mut total_bytes = 0usize;
    for photo in photos {
        let size = photo.byte_len()?;
        total_bytes += size;
        table.add_row(vec![
            Cell::new(&photo.name),
            Cell::new(captured_label(photo)),
            Cell::new(format_size(size)).set_alignment(CellAlignment::Right),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} photos, {} in {}",
        photos.len(),
        format_size(total_bytes),
        image_dir
    );
    println!();

    Ok(())
}

fn captured_label(photo: &StoredPhoto) -> String {
    photo
        .captured_at()
        .map(|at| {
            at.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "-".to_string())
}

fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}
