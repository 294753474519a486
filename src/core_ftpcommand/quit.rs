use crate::core_ftpcommand::handlers::Flow;
use crate::session::{Session, SessionError};

/// Handles the QUIT FTP command: no farewell reply, the write side just
/// goes away once any live transfer has wound down.
pub async fn handle_quit_command(session: &mut Session) -> Result<Flow, SessionError> {
    session.shutdown_writer().await;
    if let Some(transfer) = session.take_transfer() {
        transfer.outcome().await;
    }
    Ok(Flow::Quit)
}
