//! # GazeView Core Library
//!
//! Ingestion, normalization, and playback synchronization for recorded
//! session review:
//! - Heterogeneous time-string parsing
//! - Delimited-table and subtitle parsing
//! - NPY tensor decoding for gaze tracks
//! - Heuristic schema normalization into canonical records
//! - Gap-filled, merged timeline segments with stable colors
//! - Per-tick active-index resolution and quick-preview sequencing
//!
//! Everything here is synchronous and pure of I/O. The host feeds raw text
//! or bytes in, then drives [`session::SessionModel::tick`] from its frame
//! clock.

pub mod comments;
pub mod config;
pub mod error;
pub mod gaze;
pub mod labels;
pub mod model;
pub mod preview;
pub mod schema;
pub mod segments;
pub mod session;
pub mod subtitle;
pub mod sync;
pub mod table;
pub mod tensor;
pub mod time;

pub use config::ViewerConfig;
pub use error::{Error, Result};
pub use session::{ActiveState, SessionBuilder, SessionModel};
