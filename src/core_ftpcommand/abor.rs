use crate::session::{Session, SessionError};

/// Handles the ABOR FTP command.
pub async fn handle_abor_command(session: &mut Session) -> Result<(), SessionError> {
    if let Some(transfer) = session.take_transfer() {
        transfer.cancel();
        if transfer.outcome().await {
            session.reply("226 Transfer done").await?;
        } else {
            session.reply("426 Transfer aborted").await?;
        }
    }
    // Unconditional, even right after reporting on a live transfer;
    // clients in the field expect the extra line.
    session.reply("226 No active transfer").await
}
