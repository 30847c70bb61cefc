//! Batch normalization of raw robot stroke captures.
//!
//! A raw capture tree holds one directory per written character, each with
//! paired `reg_stroke`/`style_stroke` photo sequences. [`normalize_dataset`]
//! binarizes every stroke photo, crops it to the stroke's bounding box and
//! rewrites the pair under a normalized, base64-named dataset layout.
//! Malformed entries are logged and skipped; the batch always continues.

mod normalize;
mod segment;

pub use normalize::{normalize_dataset, NormalizeError, NormalizeParams, NormalizeReport};
pub use segment::{dark_foreground_mask, largest_region, otsu_threshold, PixelBox};
