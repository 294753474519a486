use crate::session::{Session, SessionError};

/// Handles the MDTM FTP command, reporting backend modification times in
/// the YYYYMMDDHHMMSS form clients expect.
pub async fn handle_mdtm_command(session: &mut Session, arg: &str) -> Result<(), SessionError> {
    let path = session.resolve_path(arg);
    match session.source().mtime(&path) {
        Some(mtime) => {
            let response = format!("213 {}", mtime.format("%Y%m%d%H%M%S"));
            session.reply(&response).await
        }
        None => session.reply("550 Unknown").await,
    }
}
