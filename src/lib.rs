//! MotionPlay Core
//!
//! Hand-landmark frames in, debounced application actions out. Also
//! records labeled sequences for offline training.

pub mod constants;
pub mod logic;

pub use logic::action::{ActionDescriptor, InputInjector, LoggingInjector, Profile};
pub use logic::clock::{Clock, ManualClock, SystemClock};
pub use logic::config::MotionConfig;
pub use logic::context::MotionContext;
pub use logic::error::{MotionError, MotionResult};
pub use logic::landmarks::{Frame, Hand, Handedness, Landmark};
pub use logic::pipeline::{FrameOutcome, MotionPipeline, PipelineMode};
