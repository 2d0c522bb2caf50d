pub mod definition;
pub mod scheme;

pub use definition::*;
pub use scheme::*;
