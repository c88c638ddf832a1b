pub mod error;
pub mod tab;
pub mod types;

pub use error::CaseFileError;
pub use tab::*;
pub use types::*;
