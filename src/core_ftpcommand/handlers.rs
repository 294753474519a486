use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_network::pasv;
use crate::session::{Session, SessionError};

/// What the dispatcher should do after a handler returns.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Routes one parsed verb to its handler.
pub async fn handle_command(
    session: &mut Session,
    cmd: FtpCommand,
    arg: &str,
) -> Result<Flow, SessionError> {
    match cmd {
        FtpCommand::USER => crate::core_ftpcommand::user::handle_user_command(session, arg).await?,
        FtpCommand::PASS => crate::core_ftpcommand::pass::handle_pass_command(session, arg).await?,
        FtpCommand::SYST => crate::core_ftpcommand::syst::handle_syst_command(session).await?,
        FtpCommand::FEAT => crate::core_ftpcommand::feat::handle_feat_command(session).await?,
        FtpCommand::OPTS => crate::core_ftpcommand::opts::handle_opts_command(session, arg).await?,
        FtpCommand::PWD => crate::core_ftpcommand::pwd::handle_pwd_command(session).await?,
        FtpCommand::TYPE => {
            crate::core_ftpcommand::type_::handle_type_command(session, arg).await?
        }
        FtpCommand::CWD => crate::core_ftpcommand::cwd::handle_cwd_command(session, arg).await?,
        FtpCommand::PASV => pasv::handle_pasv_command(session, arg).await?,
        FtpCommand::EPSV => pasv::handle_epsv_command(session, arg).await?,
        FtpCommand::LIST => crate::core_ftpcommand::list::handle_list_command(session, arg).await?,
        FtpCommand::SIZE => crate::core_ftpcommand::size::handle_size_command(session, arg).await?,
        FtpCommand::MDTM => crate::core_ftpcommand::mdtm::handle_mdtm_command(session, arg).await?,
        FtpCommand::REST => crate::core_ftpcommand::rest::handle_rest_command(session, arg).await?,
        FtpCommand::RETR => crate::core_ftpcommand::retr::handle_retr_command(session, arg).await?,
        FtpCommand::ABOR => crate::core_ftpcommand::abor::handle_abor_command(session).await?,
        FtpCommand::QUIT => return crate::core_ftpcommand::quit::handle_quit_command(session).await,
    }
    Ok(Flow::Continue)
}
