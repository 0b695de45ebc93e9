//! OBS configuration generation
//!
//! - **model**: declarative, validated description of profile, service and scenes
//! - **ini**: ordered key=value document used by the text formats
//! - **render**: model → (relative path, content, format) triples
//! - **writer**: materializes rendered files under the settings root

pub mod ini;
pub mod model;
pub mod render;
pub mod writer;

// Re-export commonly used types
pub use ini::IniDocument;
pub use model::{IdGenerator, Secret, SetupModel, SetupParams, UuidGenerator};
pub use render::render;
pub use writer::{ConfigWriter, Confirmation, ConflictPolicy, WriteReport};
