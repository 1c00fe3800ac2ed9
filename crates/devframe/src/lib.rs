//! Facade over the devframe workspace crates.
//!
//! Front-ends that want the whole stack under one dependency pull this
//! crate and reach the subsystems as modules; everything here is a plain
//! re-export of the member crates.

pub use devframe_alarm as alarm;
pub use devframe_client as client;
pub use devframe_codec as codec;
pub use devframe_registry as registry;

use devframe_registry::{CommandRegistry, Result};

/// A registry loaded with every service this build knows about.
///
/// Currently that is the alarm service alone; new services add their
/// descriptor here and become visible to the CLI and any other front-end.
pub fn default_registry() -> Result<CommandRegistry> {
    CommandRegistry::with_services(&[devframe_alarm::descriptor()])
}
