pub mod analyze;
pub mod costs;
pub mod util;

pub use analyze::*;
pub use costs::*;
pub use util::*;
