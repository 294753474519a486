use crate::session::{Session, SessionError};

/// The credential is opaque here; it is handed to the backend as-is.
pub async fn handle_pass_command(session: &mut Session, creds: &str) -> Result<(), SessionError> {
    session.source().set_credential(creds);
    session.reply("230 Whatever").await
}
