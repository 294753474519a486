// src/core_ftpcommand/pwd.rs
use crate::session::{Session, SessionError};

pub async fn handle_pwd_command(session: &mut Session) -> Result<(), SessionError> {
    let response = format!("257 \"{}\"", session.cwd());
    session.reply(&response).await
}
