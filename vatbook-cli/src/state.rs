use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use vatbook_ingest::InvoiceBook;

pub fn vatbook_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".vatbook"))
}

pub fn ensure_vatbook_home() -> Result<PathBuf> {
    let dir = vatbook_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_book_path() -> Result<PathBuf> {
    Ok(ensure_vatbook_home()?.join("book.json"))
}

/// Missing file reads as an empty book.
pub fn read_book(path: &Path) -> Result<InvoiceBook> {
    if !path.exists() {
        return Ok(InvoiceBook::new());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn write_book(path: &Path, book: &InvoiceBook) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(book)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
