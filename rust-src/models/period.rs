//! Period token sent as the `period` query parameter.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use super::Window;


/// Request token selecting the reporting period.
///
/// The backend understands `"7"`, `"30"` and `"all"`. Anything else is
/// forwarded unchanged and left to the server to interpret.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Period(String);


impl Period {
    pub const SEVEN_DAYS: &'static str = "7";
    pub const THIRTY_DAYS: &'static str = "30";
    pub const ALL: &'static str = "all";

    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn seven_days() -> Self {
        Self::new(Self::SEVEN_DAYS)
    }

    pub fn thirty_days() -> Self {
        Self::new(Self::THIRTY_DAYS)
    }

    pub fn all() -> Self {
        Self::new(Self::ALL)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The window this token selects, if it is one the backend knows.
    pub fn window(&self) -> Option<Window> {
        match self.0.as_str() {
            Self::SEVEN_DAYS => Some(Window::SevenDays),
            Self::THIRTY_DAYS => Some(Window::ThirtyDays),
            Self::ALL => Some(Window::AllTime),
            _ => None,
        }
    }
}


impl Default for Period {
    fn default() -> Self {
        Self::all()
    }
}


impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}


impl FromStr for Period {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tokens_map_to_windows() {
        assert_eq!(Period::seven_days().window(), Some(Window::SevenDays));
        assert_eq!(Period::thirty_days().window(), Some(Window::ThirtyDays));
        assert_eq!(Period::default().window(), Some(Window::AllTime));
    }

    #[test]
    fn test_unknown_token_passes_through() {
        let period: Period = "90".parse().unwrap();
        assert_eq!(period.as_str(), "90");
        assert_eq!(period.window(), None);
        assert_eq!(period.to_string(), "90");
    }
}
