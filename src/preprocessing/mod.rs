//! Preprocessing transformers.
//!
//! A [`Preprocessor`] is the unfitted definition: which columns go through which branch. Fitting
//! it on a training [`crate::types::DataSet`] yields a [`FittedPreprocessor`] holding the learned
//! parameters:
//!
//! - numeric branch ([`numeric`]): median imputation, then standard scaling
//! - categorical branch ([`categorical`]): most-frequent imputation, then one-hot encoding with
//!   unknown categories ignored
//!
//! ```rust
//! use ml_prep_pipeline::preprocessing::Preprocessor;
//! use ml_prep_pipeline::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("lunch", DataType::Utf8),
//!     Field::new("reading score", DataType::Float64),
//! ]);
//! let train = DataSet::new(
//!     schema.clone(),
//!     vec![
//!         vec![Value::Utf8("standard".to_string()), Value::Float64(70.0)],
//!         vec![Value::Utf8("free/reduced".to_string()), Value::Float64(90.0)],
//!     ],
//! );
//!
//! let pre = Preprocessor::new(vec!["reading score".to_string()], vec!["lunch".to_string()]);
//! let fitted = pre.fit(&train).unwrap();
//!
//! let unseen = DataSet::new(
//!     schema,
//!     vec![vec![Value::Utf8("none".to_string()), Value::Null]],
//! );
//! // Missing score -> median (80) -> 0 after scaling; unknown lunch -> all zeros.
//! assert_eq!(fitted.transform(&unseen).unwrap(), vec![vec![0.0, 0.0, 0.0]]);
//! ```

pub mod categorical;
pub mod column_transformer;
pub mod numeric;

pub use categorical::FittedCategoricalColumn;
pub use column_transformer::{FittedPreprocessor, Preprocessor};
pub use numeric::FittedNumericColumn;
