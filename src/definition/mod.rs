pub mod conversion;
pub mod document;
pub mod loader;

pub use conversion::*;
pub use document::*;
pub use loader::*;
