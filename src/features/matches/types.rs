//! Match, prediction and standings payloads. Optional fields default so older
//! backend builds that omit them still decode.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Scheduled,
    Timed,
    InPlay,
    Paused,
    Finished,
    Postponed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Match {
    pub id: i64,
    pub external_id: i64,
    pub competition_code: String,
    pub competition_name: String,
    #[serde(default)]
    pub matchday: Option<u32>,
    pub home_team: String,
    #[serde(default)]
    pub home_team_short: Option<String>,
    #[serde(default)]
    pub home_team_crest: Option<String>,
    #[serde(default)]
    pub home_standing_position: Option<u32>,
    #[serde(default)]
    pub home_standing_points: Option<u32>,
    pub away_team: String,
    #[serde(default)]
    pub away_team_short: Option<String>,
    #[serde(default)]
    pub away_team_crest: Option<String>,
    #[serde(default)]
    pub away_standing_position: Option<u32>,
    #[serde(default)]
    pub away_standing_points: Option<u32>,
    #[serde(default)]
    pub score_home: Option<u32>,
    #[serde(default)]
    pub score_away: Option<u32>,
    pub match_date: String,
    pub status: MatchStatus,
    #[serde(default)]
    pub prediction: Option<PredictionSummary>,
    #[serde(default)]
    pub odds_home: Option<f64>,
    #[serde(default)]
    pub odds_draw: Option<f64>,
    #[serde(default)]
    pub odds_away: Option<f64>,
    #[serde(default)]
    pub odds_updated_at: Option<String>,
}

/// Consensus forecast plus the per-logic breakdown embedded in match listings.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PredictionSummary {
    pub home_score_forecast: f64,
    pub away_score_forecast: f64,
    pub confidence: f64,
    pub bet_tip: String,
    pub home_goals_avg: Option<f64>,
    pub away_goals_avg: Option<f64>,

    pub papa_home_score: Option<f64>,
    pub papa_away_score: Option<f64>,
    pub papa_confidence: Option<f64>,
    pub papa_tip: Option<String>,

    pub grand_frere_home_score: Option<f64>,
    pub grand_frere_away_score: Option<f64>,
    pub grand_frere_confidence: Option<f64>,
    pub grand_frere_tip: Option<String>,

    pub ma_logique_home_score: Option<f64>,
    pub ma_logique_away_score: Option<f64>,
    pub ma_logique_confidence: Option<f64>,
    pub ma_logique_tip: Option<String>,
    pub ma_logique_analysis: Option<String>,

    pub h2h_home_wins: Option<u32>,
    pub h2h_away_wins: Option<u32>,
    pub h2h_draws: Option<u32>,
    pub h2h_matches_count: Option<u32>,
    pub home_form_score: Option<f64>,
    pub away_form_score: Option<f64>,
    pub gf_verdict: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConsensusLevel {
    Fort,
    Moyen,
    Faible,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LogicEvidence {
    pub home_position: Option<u32>,
    pub away_position: Option<u32>,
    pub home_points: Option<u32>,
    pub away_points: Option<u32>,
    pub league_level: Option<f64>,
    pub home_advantage: Option<f64>,
    pub home_strength: Option<ConsensusLevel>,
    pub away_strength: Option<ConsensusLevel>,
    pub h2h_home_wins: Option<u32>,
    pub h2h_away_wins: Option<u32>,
    pub h2h_draws: Option<u32>,
    pub home_form: Option<f64>,
    pub away_form: Option<f64>,
    pub home_avg_goals: Option<f64>,
    pub away_avg_goals: Option<f64>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LogicPrediction {
    pub home_win_prob: f64,
    pub draw_prob: f64,
    pub away_win_prob: f64,
    pub predicted_home_goals: f64,
    pub predicted_away_goals: f64,
    pub confidence: f64,
    pub bet_tip: String,
    pub analysis: String,
    #[serde(default)]
    pub evidence: Option<LogicEvidence>,
}

/// The three logics (Papa, Grand Frère, Ma Logique) and their consensus.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CombinedPrediction {
    pub match_id: i64,
    pub home_team: String,
    pub away_team: String,
    pub papa_prediction: Option<LogicPrediction>,
    pub grand_frere_prediction: Option<LogicPrediction>,
    pub ma_logique_prediction: Option<LogicPrediction>,
    pub final_home_goals: f64,
    pub final_away_goals: f64,
    pub final_confidence: f64,
    pub final_bet_tip: String,
    pub consensus_level: ConsensusLevel,
    pub all_agree: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Apex30ModuleReport {
    pub id: String,
    pub nom: String,
    pub poids: f64,
    pub home_val: f64,
    pub away_val: f64,
    pub description: String,
    pub analyse: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Apex30FullReport {
    pub match_id: i64,
    pub home_team: String,
    pub away_team: String,
    pub modules: Vec<Apex30ModuleReport>,
    pub summary: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Standing {
    pub position: u32,
    pub team_id: i64,
    pub team_name: String,
    #[serde(default)]
    pub team_short: String,
    #[serde(default)]
    pub team_crest: String,
    pub played_games: u32,
    pub won: u32,
    pub draw: u32,
    pub lost: u32,
    pub points: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    #[serde(default)]
    pub form: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Competition {
    pub id: i64,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub emblem: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub current_season: Option<u32>,
    #[serde(default)]
    pub current_matchday: Option<u32>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct MatchesResponse {
    pub count: usize,
    #[serde(default)]
    pub matches: Vec<Match>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct StandingsResponse {
    pub competition_code: String,
    pub competition_name: String,
    pub season: u32,
    #[serde(default)]
    pub matchday: Option<u32>,
    pub standings: Vec<Standing>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct CompetitionsResponse {
    pub count: usize,
    pub competitions: Vec<Competition>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_status_does_not_break_decoding() {
        let status: MatchStatus = serde_json::from_value(json!("SUSPENDED")).unwrap();
        assert_eq!(status, MatchStatus::Unknown);
        let status: MatchStatus = serde_json::from_value(json!("IN_PLAY")).unwrap();
        assert_eq!(status, MatchStatus::InPlay);
    }

    #[test]
    fn combined_prediction_accepts_missing_logic() {
        let prediction: CombinedPrediction = serde_json::from_value(json!({
            "match_id": 42,
            "home_team": "PSG",
            "away_team": "OM",
            "papa_prediction": null,
            "grand_frere_prediction": null,
            "ma_logique_prediction": {
                "home_win_prob": 0.55,
                "draw_prob": 0.25,
                "away_win_prob": 0.2,
                "predicted_home_goals": 2.0,
                "predicted_away_goals": 1.0,
                "confidence": 0.7,
                "bet_tip": "1",
                "analysis": "Forme supérieure à domicile"
            },
            "final_home_goals": 2.0,
            "final_away_goals": 1.0,
            "final_confidence": 0.68,
            "final_bet_tip": "1",
            "consensus_level": "MOYEN",
            "all_agree": false
        }))
        .unwrap();

        assert_eq!(prediction.consensus_level, ConsensusLevel::Moyen);
        assert!(prediction.papa_prediction.is_none());
        let logic = prediction.ma_logique_prediction.unwrap();
        assert!(logic.evidence.is_none());
    }
}
