//! Client helpers for odds endpoints.

use crate::{
    client::{ApiClient, ApiError},
    features::odds::types::{BetType, OddsResponse, ValueBetResponse},
};
use tracing::instrument;

pub async fn odds(api: &ApiClient, match_id: i64) -> Result<OddsResponse, ApiError> {
    api.get_json(&format!("/odds/{match_id}")).await
}

/// Force a refresh of a match's odds. Each call spends a provider credit on the
/// backend, so callers should not loop on it.
#[instrument(skip(api))]
pub async fn refresh_odds(api: &ApiClient, match_id: i64) -> Result<OddsResponse, ApiError> {
    api.post_without_body(&format!("/odds/{match_id}/refresh"))
        .await
}

pub async fn value_bet(
    api: &ApiClient,
    match_id: i64,
    bet: BetType,
) -> Result<ValueBetResponse, ApiError> {
    api.get_json_with_query(
        &format!("/odds/{match_id}/value-bet"),
        &[("bet_type", bet.to_string())],
    )
    .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::client::{ClientConfig, MemoryCredentialStore};
    use crate::features::auth::SessionStore;
    use anyhow::Result;
    use serde_json::json;
    use std::{net::TcpListener, sync::Arc};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn api_for(server: &MockServer) -> ApiClient {
        let config = ClientConfig::new(&server.uri(), 5).unwrap();
        ApiClient::new(
            config,
            Arc::new(MemoryCredentialStore::new()),
            SessionStore::new(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn value_bet_sends_bet_type_query() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/odds/42/value-bet"))
            .and(query_param("bet_type", "away"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "is_value_bet": true,
                "expected_value": 0.12,
                "value_percentage": 12.0,
                "implied_probability": 0.31,
                "our_probability": 0.35,
                "recommendation": "Value bet détecté"
            })))
            .mount(&server)
            .await;

        let api = api_for(&server);
        let analysis = value_bet(&api, 42, BetType::Away).await?;
        assert!(analysis.is_value_bet);
        Ok(())
    }

    #[tokio::test]
    async fn refresh_odds_posts_and_decodes() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/odds/42/refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "match_id": 42,
                "home_team": "PSG",
                "away_team": "OM",
                "odds_home": 1.65,
                "odds_draw": 3.9,
                "odds_away": 5.2,
                "odds_updated_at": "2025-03-01T10:00:00"
            })))
            .mount(&server)
            .await;

        let api = api_for(&server);
        let refreshed = refresh_odds(&api, 42).await?;
        assert_eq!(refreshed.odds_draw, Some(3.9));
        Ok(())
    }

    #[tokio::test]
    async fn provider_outage_is_reported() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/odds/7/refresh"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "detail": "Impossible de récupérer les cotes."
            })))
            .mount(&server)
            .await;

        let api = api_for(&server);
        let err = refresh_odds(&api, 7).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        Ok(())
    }
}
