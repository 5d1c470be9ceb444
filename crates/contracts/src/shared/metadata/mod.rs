//! Metadata types describing persisted entities
//!
//! Every entity declares its columns once, as compile-time constants, and the
//! generic form layer reads them to render, validate and persist records.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use contracts::domain::a003_cultura;
//!
//! let meta = &a003_cultura::ENTITY;
//! for field in meta.editable_fields() {
//!     println!("{}: {}", field.name, field.kind);
//! }
//! ```

mod field_type;
mod types;
mod validation;

pub use field_type::{FieldKind, RefTarget};
pub use types::{EntityMetadataInfo, EntityUiMetadata, FieldMetadata, FieldUiMetadata};
pub use validation::ValidationRules;
