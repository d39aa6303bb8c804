//! Built-in compilation passes.

mod conversion;
mod verification;

pub use conversion::ConversionStats;
pub use verification::{VerificationResult, VocabularyVerification};
