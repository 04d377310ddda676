#![warn(missing_docs)]
//! Engine-wide primitives shared across the voxen workspace.

mod config;
mod error;
mod rng;

pub use config::{LodeConfig, TreeConfig, WorldConfig};
pub use error::VoxenError;
pub use rng::scoped_rng;
