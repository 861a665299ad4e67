//! Heading candidacy and level assignment.
//!
//! ```text
//! line text + font  ->  validate (reject | score)  ->  classify (H1..H3)
//! ```

pub mod classify;
pub mod validate;

pub use classify::classify_level;
pub use validate::{
    evaluate_heading, is_valid_heading, HeadingFeatures, HeadingVerdict, Rejection,
};

/// `font_size / body_size`, or 1 when no usable body size is known.
pub(crate) fn font_ratio(font_size: f32, body_size: f32) -> f32 {
    if body_size > 0.0 {
        font_size / body_size
    } else {
        1.0
    }
}
