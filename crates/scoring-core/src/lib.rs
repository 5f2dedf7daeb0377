pub mod error;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;
pub mod pillar_base;
pub mod score;
pub mod stats;
pub mod traits;
pub mod types;
pub mod validation;

pub use error::*;
pub use score::*;
pub use traits::*;
pub use types::*;
pub use validation::{DataField, Severity, ValidationError, ValidationResult, ValidationWarning};
