use crate::core_network::transfer::Transfer;
use crate::session::{Session, SessionError};

/// Handles the LIST FTP command: claims the armed data connection and
/// starts the listing transfer. The completion reply comes later, from
/// the dispatcher, once the transfer is reaped.
pub async fn handle_list_command(session: &mut Session, _arg: &str) -> Result<(), SessionError> {
    let conn = session.await_data_connection().await?;
    let transfer = Transfer::spawn_list(session.source(), conn);
    session.set_transfer(transfer);
    session.reply("150 Listing").await
}
