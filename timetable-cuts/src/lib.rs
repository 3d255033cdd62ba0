//! Cut separation for curriculum-based course timetabling.
//!
//! The crate strengthens the LP relaxation of a timetabling MIP from inside
//! the host solver's cut callback. A [`CutManager`] is built once per
//! instance and then asked, once per callback, to separate cuts from the
//! current fractional point:
//!
//! - objective integrality: round up fractional bounds
//! - clique cuts over the curriculum conflict graph
//! - minimum working days per course
//! - curriculum lecture totals
//! - isolated-lecture patterns per curriculum and day
//! - triangles of the conflict graph
//!
//! The host is reached only through [`RelaxationHost`]: the crate reads
//! relaxation values and submits [`LinearCut`]s, nothing else.
//!
//! ```ignore
//! let manager = CutManager::new(instance, SeparationSettings::default())?;
//! let round = manager.separate(&mut host)?;
//! if !round.added_any() {
//!     // branch
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod cuts;
pub mod error;
pub mod graph;
pub mod host;
pub mod model;
pub mod patterns;
pub mod settings;
pub mod validator;

pub use cuts::{static_cuts, CutManager, SeparationRound, SeparationStats};
pub use error::{CutError, CutResult};
pub use graph::{CliquePool, ConflictGraph};
pub use host::{CutFamily, CutScope, CutSense, FixedRelaxation, LinearCut, RelaxationHost, Variable};
pub use model::{Course, Instance, InstanceBuilder, RelaxationSnapshot, Room};
pub use patterns::{cut_patterns, Pattern};
pub use settings::{CliqueStrategy, CutFamilies, SeparationSettings};
pub use validator::{validate_patterns, ValidationReport};
