pub mod archive;
pub mod definition;

pub use archive::*;
pub use definition::*;
