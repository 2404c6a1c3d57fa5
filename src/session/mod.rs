pub mod practice;
pub mod result;

pub use practice::{PracticeSession, SessionState};
