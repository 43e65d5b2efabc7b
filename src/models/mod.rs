pub mod period;
pub mod response;
pub mod thresholds;

pub use period::*;
pub use response::*;
pub use thresholds::*;
