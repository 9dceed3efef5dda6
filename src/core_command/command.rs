/// One parsed line of input. Verbs are matched case-insensitively; the
/// argument is kept verbatim apart from leading whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Get(String),
    Put(String),
    List,
    ChangeDir(String),
    Pwd,
    Try,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, arg.trim_start()),
            None => (line, ""),
        };

        match (verb.to_ascii_uppercase().as_str(), arg.is_empty()) {
            ("GET", false) => Command::Get(arg.to_string()),
            ("PUT", false) => Command::Put(arg.to_string()),
            ("CD", false) => Command::ChangeDir(arg.to_string()),
            ("LS" | "DIR", true) => Command::List,
            ("PWD", true) => Command::Pwd,
            ("TRY", true) => Command::Try,
            ("QUIT" | "BYE" | "EXIT", true) => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }

    /// Text of the request frame sent to the server.
    pub fn to_wire(&self) -> Option<String> {
        match self {
            Command::Get(name) => Some(format!("GET {}", name)),
            Command::Put(name) => Some(format!("PUT {}", name)),
            Command::ChangeDir(path) => Some(format!("CD {}", path)),
            Command::List => Some("LS".to_string()),
            Command::Pwd => Some("PWD".to_string()),
            Command::Try => Some("TRY".to_string()),
            Command::Quit | Command::Unknown(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbs_are_case_insensitive() {
        for input in ["ls", "Ls", "LS", "lS", "dir", "DIR"] {
            assert_eq!(Command::parse(input), Command::List, "{}", input);
        }
        assert_eq!(Command::parse("pwd"), Command::Pwd);
        assert_eq!(Command::parse("Try"), Command::Try);
        for input in ["quit", "BYE", "Exit"] {
            assert_eq!(Command::parse(input), Command::Quit);
        }
    }

    #[test]
    fn test_arguments() {
        assert_eq!(
            Command::parse("get   report 2024.pdf"),
            Command::Get("report 2024.pdf".to_string())
        );
        assert_eq!(Command::parse("PUT a.txt\r\n"), Command::Put("a.txt".to_string()));
        assert_eq!(Command::parse("cd .."), Command::ChangeDir("..".to_string()));
    }

    #[test]
    fn test_truncated_or_unknown_fall_through() {
        assert!(matches!(Command::parse("GET"), Command::Unknown(_)));
        assert!(matches!(Command::parse("get "), Command::Unknown(_)));
        assert!(matches!(Command::parse("CD"), Command::Unknown(_)));
        assert!(matches!(Command::parse("GE"), Command::Unknown(_)));
        assert!(matches!(Command::parse("GETfile"), Command::Unknown(_)));
        assert!(matches!(Command::parse("ls -l"), Command::Unknown(_)));
        assert!(matches!(Command::parse("DELETE x"), Command::Unknown(_)));
        assert!(matches!(Command::parse(""), Command::Unknown(_)));
    }

    #[test]
    fn test_to_wire() {
        assert_eq!(Command::parse("ls").to_wire().as_deref(), Some("LS"));
        assert_eq!(
            Command::parse("get a.txt").to_wire().as_deref(),
            Some("GET a.txt")
        );
        assert_eq!(Command::Quit.to_wire(), None);
    }
}
