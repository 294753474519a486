use log::info;

use crate::session::{Session, SessionError};

/// Handles the USER FTP command.
///
/// Only the service account `fwd` is known here; anything else is turned
/// away before a password is ever requested.
pub async fn handle_user_command(session: &mut Session, username: &str) -> Result<(), SessionError> {
    if username == "fwd" {
        info!("service user accepted");
        session.reply("331 Okay, give me your fancy string").await
    } else {
        info!("rejected login for {:?}", username);
        session.reply("530 Not today").await
    }
}
