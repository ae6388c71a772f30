use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Requested power transition.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    On,
    Off,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::On => "on",
            Action::Off => "off",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("unknown action '{0}', expected 'on' or 'off'")]
pub struct ParseActionError(String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" => Ok(Action::On),
            "off" => Ok(Action::Off),
            _ => Err(ParseActionError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("on", Action::On)]
    #[case("OFF", Action::Off)]
    #[case(" off ", Action::Off)]
    fn parses_actions(#[case] input: &str, #[case] expected: Action) {
        assert_eq!(input.parse::<Action>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_actions() {
        let error = "toggle".parse::<Action>().unwrap_err();
        assert_eq!(error.to_string(), "unknown action 'toggle', expected 'on' or 'off'");
    }
}
