//! Client helpers for match, prediction and standings endpoints.

use crate::{
    client::{ApiClient, ApiError},
    features::matches::types::{
        Apex30FullReport, CombinedPrediction, CompetitionsResponse, HealthStatus, Match,
        MatchesResponse, StandingsResponse,
    },
};
use tracing::instrument;

pub const DEFAULT_MATCH_LIMIT: u32 = 20;

/// Filter for upcoming matches. The backend only knows `limit`; the competition
/// is applied locally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchFilter {
    pub competition: Option<String>,
    pub limit: u32,
}

impl Default for MatchFilter {
    fn default() -> Self {
        Self {
            competition: None,
            limit: DEFAULT_MATCH_LIMIT,
        }
    }
}

/// Fetch upcoming matches, today included.
#[instrument(skip(api))]
pub async fn upcoming_matches(
    api: &ApiClient,
    filter: &MatchFilter,
) -> Result<MatchesResponse, ApiError> {
    let response: MatchesResponse = api
        .get_json_with_query("/matches/upcoming", &[("limit", filter.limit.to_string())])
        .await?;

    Ok(match filter.competition.as_deref() {
        Some(code) => filter_by_competition(response, code),
        None => response,
    })
}

fn filter_by_competition(response: MatchesResponse, code: &str) -> MatchesResponse {
    let code = code.trim().to_uppercase();
    let matches: Vec<Match> = response
        .matches
        .into_iter()
        .filter(|m| m.competition_code == code)
        .collect();
    MatchesResponse {
        count: matches.len(),
        matches,
    }
}

pub async fn today_matches(api: &ApiClient) -> Result<MatchesResponse, ApiError> {
    api.get_json("/matches/today").await
}

pub async fn match_by_id(api: &ApiClient, match_id: i64) -> Result<Match, ApiError> {
    api.get_json(&format!("/matches/{match_id}")).await
}

/// Fetch the combined prediction (three logics plus consensus).
pub async fn combined_prediction(
    api: &ApiClient,
    match_id: i64,
) -> Result<CombinedPrediction, ApiError> {
    api.get_json(&format!("/matches/{match_id}/prediction/combined"))
        .await
}

/// Fetch the detailed APEX-30 module report.
pub async fn apex30_report(api: &ApiClient, match_id: i64) -> Result<Apex30FullReport, ApiError> {
    api.get_json(&format!("/matches/{match_id}/apex30-report"))
        .await
}

pub async fn standings(
    api: &ApiClient,
    competition_code: &str,
) -> Result<StandingsResponse, ApiError> {
    let code = competition_path_segment(competition_code)?;
    api.get_json(&format!("/matches/competitions/{code}/standings"))
        .await
}

/// Competition codes are short alphanumeric tags (`PL`, `FL1`, `CL`).
fn competition_path_segment(code: &str) -> Result<String, ApiError> {
    let code = code.trim();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ApiError::InvalidInput(format!(
            "competition code must be alphanumeric, got {code:?}"
        )));
    }
    Ok(code.to_ascii_uppercase())
}

pub async fn competitions(api: &ApiClient) -> Result<CompetitionsResponse, ApiError> {
    api.get_json("/matches/competitions").await
}

pub async fn health(api: &ApiClient) -> Result<HealthStatus, ApiError> {
    api.get_json("/health").await
}
