pub mod diff;
pub mod error;
pub mod grading;
pub mod pool;
pub mod sampler;

pub use error::PracticeError;
