use crate::session::{Session, SessionError};

pub async fn handle_syst_command(session: &mut Session) -> Result<(), SessionError> {
    session.reply("215 UNIX").await
}
