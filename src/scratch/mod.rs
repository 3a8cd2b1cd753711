//! Temporary storage for in-flight captures.
//!
//! Real captures go through a scratch file: the external tool writes it,
//! the encoder reads it, and it must be gone before the capture returns
//! regardless of outcome. Removal rides on `Drop` so no code path can
//! forget it.

mod store;

pub use store::{ScratchStore, TempArtifact};
