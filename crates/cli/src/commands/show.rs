use anyhow::Result;
use snapshelf_core::{Error, PhotoStore};

pub fn run(store: &mut PhotoStore, name: &str) -> Result<()> {
    store.list_all()?;
    let photo = store
        .find(name)
        .ok_or_else(|| Error::PhotoNotFound(name.to_string()))?;
    println!("{}", photo.data);
    Ok(())
}
