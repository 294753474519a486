use log::info;

use crate::session::{Session, SessionError};

/// Handles the CWD FTP command.
///
/// Navigation only: the resolved target must already exist as far as the
/// backend is concerned, nothing is ever created.
pub async fn handle_cwd_command(session: &mut Session, arg: &str) -> Result<(), SessionError> {
    let target = session.resolve_path(arg);
    if session.source().exists(&target) {
        info!("working directory now {}", target);
        session.set_cwd(target);
        let response = format!("200 \"{}\"", session.cwd());
        session.reply(&response).await
    } else {
        session.reply("550 Unknown").await
    }
}
