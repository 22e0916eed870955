//! Command parser for the : command system

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Wallet commands
    Connect(Option<usize>),
    Disconnect,
    Account(Option<String>),

    // Contract commands
    Read,
    Add(Option<String>),

    // Message chain commands
    Refresh,
    Export(Option<String>),

    // Misc
    Copy(Option<String>),
    Help,
    Quit,

    // Unknown command
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match cmd.to_lowercase().as_str() {
        // Wallet
        "connect" | "conn" => match args {
            None => Command::Connect(None),
            Some(raw) => match raw.parse::<usize>() {
                Ok(index) => Command::Connect(Some(index)),
                Err(_) => Command::Unknown(input.to_string()),
            },
        },
        "disconnect" | "dc" => Command::Disconnect,
        "account" | "acct" => Command::Account(args),

        // Contract
        "read" | "last" => Command::Read,
        "add" | "phrase" => Command::Add(args),

        // Message chain
        "refresh" | "reload" => Command::Refresh,
        "export" | "exp" => Command::Export(args),

        // Misc
        "copy" | "yank" => Command::Copy(args),
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,

        _ => Command::Unknown(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wallet_commands() {
        assert_eq!(parse_command("connect"), Command::Connect(None));
        assert_eq!(parse_command("conn 2"), Command::Connect(Some(2)));
        assert_eq!(
            parse_command("connect mainnet"),
            Command::Unknown("connect mainnet".to_string())
        );
        assert_eq!(parse_command("dc"), Command::Disconnect);
        assert_eq!(
            parse_command("account 1"),
            Command::Account(Some("1".to_string()))
        );
        assert_eq!(parse_command("account"), Command::Account(None));
    }

    #[test]
    fn test_parse_phrase_commands() {
        assert_eq!(parse_command("read"), Command::Read);
        assert_eq!(
            parse_command("add  banana split  "),
            Command::Add(Some("banana split".to_string()))
        );
        assert_eq!(parse_command("add"), Command::Add(None));
        assert_eq!(parse_command("add    "), Command::Add(None));
    }

    #[test]
    fn test_parse_chain_commands() {
        assert_eq!(parse_command("refresh"), Command::Refresh);
        assert_eq!(
            parse_command("export json"),
            Command::Export(Some("json".to_string()))
        );
        assert_eq!(parse_command("EXPORT"), Command::Export(None));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse_command("notacommand"),
            Command::Unknown("notacommand".to_string())
        );
        assert_eq!(parse_command("q"), Command::Quit);
    }
}
