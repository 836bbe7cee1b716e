//! `format`: erase the volume and create a fresh filesystem.

use dosfs_types::error::Result;
use dosfs_vfs::FormatOptions;

use crate::confirm::ConfirmPolicy;
use crate::session::Session;

/// Format the volume after an unconditional confirmation. Returns `false`
/// when the user declined.
pub fn format(session: &mut Session<'_>, options: &FormatOptions) -> Result<bool> {
    let question = format!("Erase everything in [{}]", session.device);
    if !session.confirm(ConfirmPolicy::Prompt, &question, true) {
        return Ok(false);
    }
    session.vol.format(options)?;
    log::info!("formatted [{}] as {}", session.device, options.fs);
    Ok(true)
}
