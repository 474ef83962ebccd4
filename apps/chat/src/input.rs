//! Parsing of one line typed at the chat prompt.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Free text for the session; blank text is passed through and ignored there.
    Ask(String),
    /// `/N`: the suggestion with global number `N`.
    Suggestion(usize),
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_line(line: &str) -> UserAction {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.trim().strip_prefix('/') else {
        return UserAction::Ask(line.to_string());
    };

    match command.trim() {
        "quit" | "exit" | "q" => UserAction::Quit,
        "help" | "?" => UserAction::Help,
        other => match other.parse::<usize>() {
            Ok(number) => UserAction::Suggestion(number),
            Err(_) => UserAction::Unknown(other.to_string()),
        },
    }
}
