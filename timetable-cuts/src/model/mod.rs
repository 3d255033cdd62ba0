//! Instance and relaxation data.

mod instance;
mod snapshot;

pub use instance::{Course, Curriculum, Instance, InstanceBuilder, Restriction, Room};
pub use snapshot::RelaxationSnapshot;
