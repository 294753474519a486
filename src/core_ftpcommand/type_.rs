use crate::session::{Session, SessionError};

/// Handles the TYPE FTP command. Only binary (image) mode is supported.
pub async fn handle_type_command(session: &mut Session, arg: &str) -> Result<(), SessionError> {
    if arg == "I" {
        session.reply("200 OK").await
    } else {
        session.reply("504 Unsupported type").await
    }
}
