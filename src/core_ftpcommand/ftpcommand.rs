#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    SYST,
    FEAT,
    OPTS,
    PWD,
    TYPE,
    CWD,
    PASV,
    EPSV,
    LIST,
    SIZE,
    MDTM,
    REST,
    RETR,
    ABOR,
    QUIT,
}

impl FtpCommand {
    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "SYST" => Some(FtpCommand::SYST),
            "FEAT" => Some(FtpCommand::FEAT),
            "OPTS" => Some(FtpCommand::OPTS),
            "PWD" => Some(FtpCommand::PWD),
            "TYPE" => Some(FtpCommand::TYPE),
            "CWD" => Some(FtpCommand::CWD),
            "PASV" => Some(FtpCommand::PASV),
            "EPSV" => Some(FtpCommand::EPSV),
            "LIST" => Some(FtpCommand::LIST),
            "SIZE" => Some(FtpCommand::SIZE),
            "MDTM" => Some(FtpCommand::MDTM),
            "REST" => Some(FtpCommand::REST),
            "RETR" => Some(FtpCommand::RETR),
            "ABOR" => Some(FtpCommand::ABOR),
            "QUIT" => Some(FtpCommand::QUIT),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FtpCommand;

    #[test]
    fn verbs_parse_case_insensitively() {
        assert_eq!(FtpCommand::from_str("retr"), Some(FtpCommand::RETR));
        assert_eq!(FtpCommand::from_str("Pasv"), Some(FtpCommand::PASV));
        assert_eq!(FtpCommand::from_str("QUIT"), Some(FtpCommand::QUIT));
    }

    #[test]
    fn unknown_verbs_are_rejected() {
        assert_eq!(FtpCommand::from_str("STOR"), None);
        assert_eq!(FtpCommand::from_str(""), None);
    }
}
