// Document layer: the single resume model, its partial (hydration) form,
// the section editors and the observable store that owns the model.

pub mod collections;
pub mod handlers;
pub mod model;
pub mod partial;
pub mod store;

use thiserror::Error;

pub use collections::SectionKind;
pub use store::DocumentStore;

/// Rejected edit. The model is left untouched when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Unknown section '{0}'")]
    UnknownSection(String),

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Section '{section}' has no field '{field}'")]
    UnknownSectionField { section: SectionKind, field: String },

    #[error("Index {index} is out of bounds for section '{section}' (length {len})")]
    IndexOutOfBounds {
        section: SectionKind,
        index: usize,
        len: usize,
    },
}
