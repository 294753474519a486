use crate::session::{Session, SessionError};

/// Handles the REST FTP command, noting the offset the next RETR starts
/// at. A malformed offset drops the session.
pub async fn handle_rest_command(session: &mut Session, arg: &str) -> Result<(), SessionError> {
    let offset = arg
        .trim()
        .parse::<u64>()
        .map_err(|_| SessionError::ProtocolViolation(format!("REST {}", arg)))?;
    session.set_rest(offset);
    session.reply("350 Duly noted").await
}
