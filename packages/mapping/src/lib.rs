//! # Fieldmap Mapping
//!
//! Mapping model and overlay engine for Fieldmap.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: indexed field trees               │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ mapping: overlay engine + session           │
//! │  - Mapping set with one active mapping      │
//! │  - Collection-mode selection eligibility    │
//! │  - Flag rewrite pass per document           │
//! │  - Selection / expand / search commands     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ rendering: rows, icons, lines               │   (external)
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Mappings are read-only input**: the engine only rewrites field
//!    flags, never the mapping set
//! 2. **One pass, whole tree**: every overlay run resets and recomputes all
//!    flags so stale state cannot survive
//! 3. **Bad paths degrade**: an unresolvable mapping path skips that field
//!    for the pass and nothing else
//! 4. **Rejections carry reasons**: the only user-visible failure is a
//!    selection refused with the field's stated exclusion reason

mod errors;
mod model;
mod overlay;
mod session;

pub use errors::SelectionError;
pub use model::{FieldMapping, MappingDefinition, TransitionMode};
pub use overlay::{selection_eligibility, update_document, CollectionMode};
pub use session::{MappingSession, SelectionChange, SessionConfig};

// Re-export the document types callers inevitably need alongside.
pub use fieldmap_document::{DocumentDefinition, Field, FieldId};
