//! Validation of offset candidates against the full model/space pair.
//!
//! - [`translation`]: position + orientation check for translation offsets.
//! - [`transform`]: 16-component check for full rigid-transform offsets.

pub mod transform;
pub mod translation;

pub use crate::diagnostics::Rejection;
pub use transform::TransformMatcher;
pub use translation::{validate_translation, TranslationValidator};

use crate::search::SearchParams;
use crate::types::{Offset, PoseList};

/// Re-check any offset against the pair with the validator matching its
/// kind. Idempotent on offsets returned by a search with the same params.
pub fn validate_offset(
    offset: &Offset,
    model: &PoseList,
    space: &PoseList,
    params: &SearchParams,
) -> bool {
    match offset {
        Offset::Translation(t) => validate_translation(t, model, space, &params.validation),
        Offset::Transform(tf) => TransformMatcher::new(space, params.composition.element_tolerance)
            .validate(tf, model)
            .is_ok(),
    }
}
