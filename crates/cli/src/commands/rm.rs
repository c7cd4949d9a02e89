use anyhow::Result;
use snapshelf_core::PhotoStore;

pub fn run(store: &mut PhotoStore, name: &str) -> Result<()> {
    store.list_all()?;
    store.delete_by_name(name)?;
    println!("Deleted {name} ({} photos left)", store.photos().len());
    Ok(())
}
