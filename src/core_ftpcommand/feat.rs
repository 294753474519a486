use crate::session::{Session, SessionError};

/// Handles the FEAT FTP command: the fixed extension list clients probe
/// for before relying on EPSV, SIZE and friends.
pub async fn handle_feat_command(session: &mut Session) -> Result<(), SessionError> {
    session
        .reply_multi(&[
            "211-Features:",
            " EPSV",
            " MDTM",
            " REST STREAM",
            " SIZE",
            " TVFS",
            " UTF8",
            "211 End",
        ])
        .await
}
