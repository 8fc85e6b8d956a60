mod api;
mod checkpoint;
mod error;
mod ids;

pub use api::*;
pub use checkpoint::*;
pub use error::*;
pub use ids::*;

/// The largest number of witness signatures a merged checkpoint can be requested with.
pub const MAX_SIGS: u32 = 100;
