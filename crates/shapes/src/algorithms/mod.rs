pub mod classification;
pub mod extraction;
pub mod preprocessing;
pub mod simplification;
pub mod symmetry;

pub use classification::*;
pub use extraction::*;
pub use preprocessing::*;
pub use simplification::*;
pub use symmetry::*;
