pub mod clipboard;
pub mod config;
pub mod history;
pub mod io;
pub mod layout;
pub mod reducer;
pub mod shortcuts;
pub mod store;

pub use clipboard::Clipboard;
pub use config::EditorConfig;
pub use history::{History, Snapshot};
pub use io::{IoError, OpenError, OpenOutcome, ProjectFs, SaveOutcome, open, save, save_as};
pub use layout::{LayoutDirection, LayoutEngine};
pub use reducer::{Action, CanvasState, EdgeChange, NodeChange, StoreError, reduce};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use store::{CanvasStore, ShortcutOutcome};
