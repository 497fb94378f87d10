use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct OddsResponse {
    pub match_id: i64,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub odds_home: Option<f64>,
    #[serde(default)]
    pub odds_draw: Option<f64>,
    #[serde(default)]
    pub odds_away: Option<f64>,
    #[serde(default)]
    pub odds_updated_at: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ValueBetResponse {
    pub is_value_bet: bool,
    pub expected_value: f64,
    pub value_percentage: f64,
    pub implied_probability: f64,
    pub our_probability: f64,
    pub recommendation: String,
}

/// Outcome a value bet is evaluated for.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BetType {
    Home,
    Draw,
    Away,
}

impl BetType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Draw => "draw",
            Self::Away => "away",
        }
    }
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BetType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "home" | "1" => Ok(Self::Home),
            "draw" | "x" | "n" => Ok(Self::Draw),
            "away" | "2" => Ok(Self::Away),
            other => Err(format!("unknown bet type '{other}', expected home, draw or away")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bet_type_parses_names_and_tips() {
        assert_eq!("HOME".parse::<BetType>(), Ok(BetType::Home));
        assert_eq!("x".parse::<BetType>(), Ok(BetType::Draw));
        assert_eq!("2".parse::<BetType>(), Ok(BetType::Away));
        assert!("over".parse::<BetType>().is_err());
    }

    #[test]
    fn bet_type_displays_query_value() {
        assert_eq!(BetType::Draw.to_string(), "draw");
    }
}
