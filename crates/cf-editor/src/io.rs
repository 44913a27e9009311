//! Save and open flows over a host-provided file system.
//!
//! The store never touches disk. Hosts implement [`ProjectFs`] (native
//! dialogs, a browser download, an in-memory map in tests) and the flows
//! here handle path bookkeeping and decoding.

use crate::store::CanvasStore;
use cf_core::document::{self, ValidationError};
use thiserror::Error;

/// File access supplied by the host application.
pub trait ProjectFs {
    /// Read the whole file at `path` as UTF-8 text.
    fn read_text(&self, path: &str) -> Result<String, IoError>;

    /// Replace the file at `path` with `text`.
    fn write_text(&mut self, path: &str, text: &str) -> Result<(), IoError>;

    /// Ask the user which project to open. `None` means cancelled.
    fn choose_open_path(&mut self) -> Option<String>;

    /// Ask the user where to save. `None` means cancelled.
    fn choose_save_path(&mut self) -> Option<String>;
}

/// A file-system collaborator failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IoError {
    #[error("failed to read `{path}`: {reason}")]
    Read { path: String, reason: String },
    #[error("failed to write `{path}`: {reason}")]
    Write { path: String, reason: String },
}

/// Why an open did not replace the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpenError {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("invalid project file: {0}")]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(String),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened(String),
    Cancelled,
}

/// Save to the current path, asking for one first if the canvas was never
/// saved or opened.
///
/// # Errors
/// Encoding or write failures. The current path is only updated after a
/// successful write.
pub fn save(store: &mut CanvasStore, fs: &mut dyn ProjectFs) -> Result<SaveOutcome, IoError> {
    match store.current_path().map(str::to_owned) {
        Some(path) => write_to(store, fs, path),
        None => save_as(store, fs),
    }
}

/// Always ask for a destination, then save there.
pub fn save_as(store: &mut CanvasStore, fs: &mut dyn ProjectFs) -> Result<SaveOutcome, IoError> {
    let Some(path) = fs.choose_save_path() else {
        log::debug!("save cancelled");
        return Ok(SaveOutcome::Cancelled);
    };
    write_to(store, fs, path)
}

fn write_to(
    store: &mut CanvasStore,
    fs: &mut dyn ProjectFs,
    path: String,
) -> Result<SaveOutcome, IoError> {
    let doc = store.get_document();
    let text = document::to_json(&doc).map_err(|e| IoError::Write {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    fs.write_text(&path, &text)?;
    log::info!("saved {} node(s) to {path}", doc.nodes.len());
    store.set_current_path(Some(path.clone()));
    Ok(SaveOutcome::Saved(path))
}

/// Ask for a project file, read and decode it, then replace the canvas.
///
/// # Errors
/// Read failures and invalid documents. Either way the store keeps its
/// nodes, edges, history and current path.
pub fn open(store: &mut CanvasStore, fs: &mut dyn ProjectFs) -> Result<OpenOutcome, OpenError> {
    let Some(path) = fs.choose_open_path() else {
        log::debug!("open cancelled");
        return Ok(OpenOutcome::Cancelled);
    };
    let text = fs.read_text(&path)?;
    let doc = document::decode(text.as_bytes()).inspect_err(|err| {
        log::warn!("rejected {path}: {err}");
    })?;
    store.load_document(doc);
    store.set_current_path(Some(path.clone()));
    Ok(OpenOutcome::Opened(path))
}
