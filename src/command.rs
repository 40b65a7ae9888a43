use pixelwall_common::{CellId, Color, ParseCellIdError, ParseColorError};
use std::fmt;

pub const HELP: &str = "\
commands:
  click <id>          pick a cell by id
  click <row> <col>   pick a cell by position
  color <#rrggbb>     paint the picked cell (a bare #color works too)
  cancel              put the picker away (so does an empty line)
  show                draw the wall again
  quit                leave";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Click(CellId),
    ClickAt { row: u32, col: u32 },
    Color(Color),
    Cancel,
    Show,
    Help,
    Quit,
}

#[derive(Debug)]
pub enum ParseCommandError {
    Unknown(String),
    MissingArgument(&'static str),
    TrailingArguments,
    InvalidId(ParseCellIdError),
    InvalidPosition,
    InvalidColor(ParseColorError),
}

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(word) => write!(f, "unknown command {word:?}, try `help`"),
            Self::MissingArgument(what) => write!(f, "missing {what}"),
            Self::TrailingArguments => f.write_str("too many arguments"),
            Self::InvalidId(error) => write!(f, "{error}"),
            Self::InvalidPosition => f.write_str("row and column must be numbers"),
            Self::InvalidColor(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for ParseCommandError {}

impl Command {
    /// Parse a line. `picking` tells whether the picker is currently open,
    /// which turns bare colors and empty lines into picker answers.
    ///
    /// Returns `Ok(None)` for lines that mean nothing (blank, picker closed).
    pub fn parse(line: &str, picking: bool) -> Result<Option<Self>, ParseCommandError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(picking.then_some(Self::Cancel));
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "click" | "c" => {
                let first = words.next().ok_or(ParseCommandError::MissingArgument("cell id"))?;
                match words.next() {
                    None => Self::Click(first.parse().map_err(ParseCommandError::InvalidId)?),
                    Some(second) => {
                        let row = first.parse().map_err(|_| ParseCommandError::InvalidPosition)?;
                        let col = second.parse().map_err(|_| ParseCommandError::InvalidPosition)?;
                        Self::ClickAt { row, col }
                    }
                }
            }
            "color" => {
                let value = words.next().ok_or(ParseCommandError::MissingArgument("color"))?;
                Self::Color(Color::parse_hex(value).map_err(ParseCommandError::InvalidColor)?)
            }
            "cancel" => Self::Cancel,
            "show" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ if picking && verb.starts_with('#') => {
                Self::Color(Color::parse_hex(verb).map_err(ParseCommandError::InvalidColor)?)
            }
            _ => return Err(ParseCommandError::Unknown(verb.to_owned())),
        };

        if words.next().is_some() {
            return Err(ParseCommandError::TrailingArguments);
        }

        Ok(Some(command))
    }
}
