//! Landmarks Module - Hand observations and normalization
//!
//! - `types` - Landmark, Hand, Frame and their normalized forms
//! - `layout` - The authoritative 21-point hand layout and its hash
//! - `normalize` - Wrist-origin translation

pub mod layout;
pub mod normalize;
pub mod types;


pub use layout::{LayoutInfo, FORMAT_VERSION, LANDMARK_COUNT, WRIST_INDEX};
pub use normalize::{normalize_frame, normalize_hand};
pub use types::{Frame, Hand, Handedness, Landmark, NormalizedFrame, NormalizedHand};
