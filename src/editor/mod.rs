//! Row editors backing the trade form.

mod entry_manager;

pub use entry_manager::{EditorError, EntryManager};
