pub mod canonical;
pub mod error;
pub mod signature;
pub mod timestamp;

pub use error::{AppError, Result};
pub use signature::DigestAlgorithm;
