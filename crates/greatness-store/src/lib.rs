//! Save slot persistence for the Greatness progression engine.
//!
//! The engine serializes its whole state into a single versioned
//! document and hands the text to a [`SaveStore`]. A store knows nothing
//! about the document's shape; it keeps exactly one slot.
//!
//! # Modules
//!
//! - [`file`] -- on-disk slot with atomic replace
//! - [`memory`] -- in-process slot for tests and headless runs
//! - [`error`] -- shared error type

pub mod error;
pub mod file;
pub mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// A single persistent save slot.
pub trait SaveStore: Send {
    /// Read the slot. `Ok(None)` means nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the slot exists but cannot be read.
    fn read(&self) -> Result<Option<String>, StoreError>;

    /// Replace the slot contents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the slot cannot be written.
    fn write(&mut self, document: &str) -> Result<(), StoreError>;

    /// Remove the slot. Clearing an empty slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if an existing slot cannot be removed.
    fn clear(&mut self) -> Result<(), StoreError>;
}
