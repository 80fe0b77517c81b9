#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    NewGame,
    Quit,
    Help,
    Unknown(String),
    /// Raw text handed to the controller, which normalises or ignores it.
    Guess(String),
}

pub const HELP: &str = "Type a letter and press enter to guess.\n\
:new, :restart  start a new game\n\
:help           show this help\n\
:quit, :q       exit";

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }

    let Some(name) = trimmed.strip_prefix(':') else {
        return Command::Guess(line.to_string());
    };

    match name.to_ascii_lowercase().as_str() {
        "new" | "restart" => Command::NewGame,
        "quit" | "q" => Command::Quit,
        "help" | "h" | "?" => Command::Help,
        _ => Command::Unknown(trimmed.to_string()),
    }
}
