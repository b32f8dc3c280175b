//! Action Module - Motion label → application input
//!
//! - `descriptor` - What a label maps to (key, char, mouse, text)
//! - `profile` - Label mappings, atomic handle, on-disk store
//! - `mapper` - Resolves TriggerEvents and calls the injector
//! - `watcher` - Hot-reload of the active profile file

pub mod descriptor;
pub mod mapper;
pub mod profile;
pub mod watcher;

pub use descriptor::{ActionDescriptor, MouseButton, NamedKey};
pub use mapper::{ActionMapper, ActionOutcome, InputInjector, LoggingInjector};
pub use profile::{load_profile_file, Profile, ProfileHandle, ProfileStore};
pub use watcher::ProfileWatcher;
