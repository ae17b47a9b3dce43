use std::str::FromStr;

use derive_more::Display;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Info,
    Stat(String),
    Size(String),
    Cd(String),
    Ls(Option<String>),
    Read { name: String, offset: u32, length: u32 },
    Volume,
    Mkdir(String),
    Rmdir(String),
    Quit,
}

#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum ParseError {
    #[display("unknown command {_0}")]
    Unknown(String),
    #[display("usage: {_0}")]
    Usage(&'static str),
    #[display("{_0} is not a valid number")]
    Number(String),
}

fn usage(command: &str) -> Option<&'static str> {
    let usage = match command {
        "info" => "info",
        "stat" => "stat FILE_NAME/DIR_NAME",
        "size" => "size FILE_NAME",
        "cd" => "cd DIR_NAME",
        "ls" => "ls [DIR_NAME]",
        "read" => "read FILE_NAME POSITION NUM_BYTES",
        "volume" => "volume",
        "mkdir" => "mkdir DIR_NAME",
        "rmdir" => "rmdir DIR_NAME",
        "quit" => "quit",
        _ => return None,
    };
    Some(usage)
}

fn number(word: &str) -> Result<u32, ParseError> {
    word.parse().map_err(|_| ParseError::Number(word.to_string()))
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();
        let command = match (command, args.as_slice()) {
            ("info", []) => Self::Info,
            ("stat", [name]) => Self::Stat(name.to_string()),
            ("size", [name]) => Self::Size(name.to_string()),
            ("cd", [name]) => Self::Cd(name.to_string()),
            ("ls", []) => Self::Ls(None),
            ("ls", [name]) => Self::Ls(Some(name.to_string())),
            ("read", [name, offset, length]) => {
                Self::Read { name: name.to_string(), offset: number(offset)?, length: number(length)? }
            }
            ("volume", []) => Self::Volume,
            ("mkdir", [name]) => Self::Mkdir(name.to_string()),
            ("rmdir", [name]) => Self::Rmdir(name.to_string()),
            ("quit", []) => Self::Quit,
            (command, _) => match usage(command) {
                Some(usage) => return Err(ParseError::Usage(usage)),
                None => return Err(ParseError::Unknown(command.to_string())),
            },
        };
        Ok(command)
    }
}

#[cfg(test)]
mod test {
    use super::{Command, ParseError};

    #[test]
    fn test_parse() {
        assert_eq!("info".parse::<Command>(), Ok(Command::Info));
        assert_eq!("  stat  A.TXT ".parse::<Command>(), Ok(Command::Stat("A.TXT".into())));
        assert_eq!("ls".parse::<Command>(), Ok(Command::Ls(None)));
        assert_eq!("ls ..".parse::<Command>(), Ok(Command::Ls(Some("..".into()))));
        let read = Command::Read { name: "A.TXT".into(), offset: 4600, length: 1000 };
        assert_eq!("read A.TXT 4600 1000".parse::<Command>(), Ok(read));
        assert_eq!("quit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        let result: Result<Command, _> = "format".parse();
        assert_eq!(result, Err(ParseError::Unknown("format".into())));
        let result: Result<Command, _> = "mkdir A B".parse();
        assert_eq!(result, Err(ParseError::Usage("mkdir DIR_NAME")));
        let result: Result<Command, _> = "read A.TXT -1 10".parse();
        assert_eq!(result, Err(ParseError::Number("-1".into())));
        let result: Result<Command, _> = "volume now".parse();
        assert_eq!(result, Err(ParseError::Usage("volume")));
    }
}
