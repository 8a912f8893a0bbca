use super::StateTokenError;
use regex::Regex;

/// validates single view state tokens. a token that is absent, does not
/// match its pattern or is out of range yields None.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    time: Regex,
    coordinate: Regex,
}

impl TokenValidator {
    pub const TIME_PATTERN: &'static str = r"^\d+$";
    pub const COORDINATE_PATTERN: &'static str = r"^-?\d+\.\d+$";
    /// largest integer a double represents exactly, 2^53 - 1
    pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

    pub fn new() -> Result<TokenValidator, StateTokenError> {
        Ok(TokenValidator {
            time: build("time", Self::TIME_PATTERN)?,
            coordinate: build("coordinate", Self::COORDINATE_PATTERN)?,
        })
    }

    /// a time budget in whole seconds.
    pub fn time(&self, token: Option<&str>) -> Option<u64> {
        let token = token.filter(|t| self.time.is_match(t))?;
        token
            .parse::<u64>()
            .ok()
            .filter(|t| *t <= Self::MAX_SAFE_INTEGER)
    }

    /// a latitude or longitude with a decimal point.
    pub fn coordinate(&self, token: Option<&str>) -> Option<f64> {
        let token = token.filter(|t| self.coordinate.is_match(t))?;
        token.parse::<f64>().ok().filter(|c| c.is_finite())
    }
}

fn build(kind: &'static str, pattern: &'static str) -> Result<Regex, StateTokenError> {
    Regex::new(pattern).map_err(|e| StateTokenError::PatternError {
        kind,
        pattern,
        message: e.to_string(),
    })
}
