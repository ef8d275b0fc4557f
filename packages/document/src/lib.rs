//! # Fieldmap Document
//!
//! Field-tree model for one side of a mapping session.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ inspection service: schema → raw fields     │   (external)
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ document: tree model + lazy expansion       │
//! │  - Build indexed tree from raw fields       │
//! │  - Cache one-level prototypes per class     │
//! │  - Materialize subtrees on path lookup      │
//! │  - Selection / search / collapse commands   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ mapping: overlay pass rewrites field flags  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Build once, grow in place**: the tree is populated exactly once and
//!    only ever extended by the lazy resolver; indexes are append-only
//! 2. **Paths address fields**: dot-separated display names are the only
//!    cross-layer handle to a field
//! 3. **Prototypes are copied, never shared**: every materialization
//!    deep-copies the cached subtree so overlay flags stay independent
//! 4. **Degrade, don't abort**: missing metadata and missing prototypes are
//!    diagnostics, not failures
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fieldmap_document::{DocumentDefinition, InspectionFilters, parse_raw_fields};
//!
//! let raw = parse_raw_fields(&inspection_response)?;
//! let mut doc = DocumentDefinition::new("PurchaseOrder", true);
//! doc.populate_from_fields(raw, &InspectionFilters::default())?;
//!
//! // Deep lookups expand the tree on demand
//! let field = doc.get_field("Order.Customer.Email")?;
//! ```

mod builder;
mod document;
mod errors;
mod field;
mod raw;
pub mod walk;

pub use document::DocumentDefinition;
pub use errors::{DocumentError, DocumentResult};
pub use field::{
    display_name_of, ExpansionState, Field, FieldId, StructuralType, NONE_FIELD_PATH,
    PATH_SEPARATOR,
};
pub use raw::{parse_raw_fields, InspectionFilters, RawField, ResolutionStatus};
