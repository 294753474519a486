use crate::session::{Session, SessionError};

/// Handles the OPTS FTP command. UTF8 is the only recognized option, and
/// it cannot be switched off.
pub async fn handle_opts_command(session: &mut Session, arg: &str) -> Result<(), SessionError> {
    let mut parts = arg.split_whitespace();
    match parts.next() {
        None => session.reply("501 Option required").await,
        Some(option) if option.eq_ignore_ascii_case("utf8") => match parts.next() {
            None => session.reply("200 Always on").await,
            Some(value) if value.eq_ignore_ascii_case("on") => {
                session.reply("200 Always on").await
            }
            Some(_) => session.reply("501 Always on").await,
        },
        Some(_) => session.reply("501 Unknown option").await,
    }
}
