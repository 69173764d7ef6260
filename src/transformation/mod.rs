//! Transformation: fitting the preprocessor on the training split and producing model-ready
//! matrices for both splits.
//!
//! Each output row is the preprocessed feature vector with the target value appended as the
//! last column. The fitted [`crate::preprocessing::FittedPreprocessor`] is persisted next to the
//! matrices so new rows can be transformed identically at inference time.

pub mod stage;

pub use stage::{DataTransformation, TransformationArtifacts};
