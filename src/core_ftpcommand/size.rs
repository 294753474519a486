use crate::session::{Session, SessionError};

/// Handles the SIZE FTP command.
pub async fn handle_size_command(session: &mut Session, arg: &str) -> Result<(), SessionError> {
    let path = session.resolve_path(arg);
    match session.source().size(&path) {
        Some(size) => session.reply(&format!("213 {}", size)).await,
        None => session.reply("550 Unknown").await,
    }
}
