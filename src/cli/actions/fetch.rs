use crate::{
    cli::globals::GlobalArgs,
    client::ApiError,
    features::{
        auth::SessionEvent,
        matches::{MatchFilter, client as matches},
        odds::{BetType, client as odds},
    },
};
use anyhow::{Context, Result, anyhow};
use serde::Serialize;

#[derive(Debug)]
pub enum Query {
    Upcoming(MatchFilter),
    Today,
    Match(i64),
    Prediction(i64),
    Report(i64),
    Standings(String),
    Competitions,
    Odds { match_id: i64, refresh: bool },
    ValueBet { match_id: i64, bet: BetType },
    Health,
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub query: Query,
}

/// Print a response as pretty JSON on stdout.
/// # Errors
/// Returns an error if the value cannot be serialized.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render response")?;
    println!("{rendered}");
    Ok(())
}

/// Execute a read-only domain query.
/// # Errors
/// Returns an error if the client cannot be built or the request failed.
pub async fn execute(args: Args) -> Result<()> {
    let api = args.globals.api_client()?;
    let mut events = api.session().subscribe();

    let result = match &args.query {
        Query::Upcoming(filter) => render(matches::upcoming_matches(&api, filter).await),
        Query::Today => render(matches::today_matches(&api).await),
        Query::Match(id) => render(matches::match_by_id(&api, *id).await),
        Query::Prediction(id) => render(matches::combined_prediction(&api, *id).await),
        Query::Report(id) => render(matches::apex30_report(&api, *id).await),
        Query::Standings(code) => render(matches::standings(&api, code).await),
        Query::Competitions => render(matches::competitions(&api).await),
        Query::Odds { match_id, refresh } => {
            if *refresh {
                render(odds::refresh_odds(&api, *match_id).await)
            } else {
                render(odds::odds(&api, *match_id).await)
            }
        }
        Query::ValueBet { match_id, bet } => render(odds::value_bet(&api, *match_id, *bet).await),
        Query::Health => render(matches::health(&api).await),
    };

    if let Ok(SessionEvent::LoginRequired) = events.try_recv() {
        return Err(anyhow!("Session expired. Run `pronoscore login`."));
    }

    result
}

fn render<T: Serialize>(response: Result<T, ApiError>) -> Result<()> {
    print_json(&response?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{CredentialPair, CredentialStore, FileCredentialStore};
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[tokio::test]
    async fn dead_session_asks_for_login() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let dir = tempfile::tempdir()?;
        let credentials = dir.path().join("credentials.json");
        FileCredentialStore::new(&credentials)
            .save(&CredentialPair::new("expired", "revoked"))?;

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/matches/today"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/refresh"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "detail": "Refresh token invalide"
            })))
            .mount(&server)
            .await;

        let args = Args {
            globals: GlobalArgs::new(server.uri(), 5, Some(credentials.clone())),
            query: Query::Today,
        };
        let err = execute(args).await.err().map(|e| e.to_string());

        assert_eq!(
            err.as_deref(),
            Some("Session expired. Run `pronoscore login`.")
        );
        assert!(!credentials.exists());
        Ok(())
    }
}
