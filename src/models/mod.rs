pub mod endpoint;
pub mod outcome;
pub mod target;

pub use endpoint::*;
pub use outcome::*;
pub use target::*;
