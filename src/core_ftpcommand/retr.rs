use crate::core_network::transfer::Transfer;
use crate::session::{Session, SessionError};

/// Handles the RETR FTP command.
///
/// A stored REST offset is consumed here, whatever the transfer's
/// eventual outcome.
pub async fn handle_retr_command(session: &mut Session, arg: &str) -> Result<(), SessionError> {
    let path = session.resolve_path(arg);
    if !session.source().exists(&path) {
        return session.reply("550 Unknown").await;
    }
    let conn = session.await_data_connection().await?;
    let offset = session.take_rest().unwrap_or(0);
    let transfer = Transfer::spawn_retr(session.source(), path, offset, conn);
    session.set_transfer(transfer);
    session.reply("150 Starting transfer").await
}
