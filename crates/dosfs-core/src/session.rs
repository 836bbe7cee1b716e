//! Everything a command handler needs from its surroundings.

use dosfs_vfs::Volume;

use crate::confirm::{self, ConfirmPolicy, Prompter};

/// A mounted volume together with the prompt capability and the device
/// name shown in messages (`[floppy.img]:path`).
pub struct Session<'a> {
    pub vol: &'a mut dyn Volume,
    pub prompter: &'a mut dyn Prompter,
    pub device: String,
}

impl<'a> Session<'a> {
    pub fn new(
        vol: &'a mut dyn Volume,
        prompter: &'a mut dyn Prompter,
        device: impl Into<String>,
    ) -> Self {
        Self {
            vol,
            prompter,
            device: device.into(),
        }
    }

    /// See [`confirm::should_proceed`].
    pub fn confirm(&mut self, policy: ConfirmPolicy, question: &str, ambiguous: bool) -> bool {
        confirm::should_proceed(policy, &mut *self.prompter, question, ambiguous)
    }
}
