use std::sync::Arc;

use espn_scoreboard::{
    HttpPageFetcher, League, LeagueId, PageFetcher, ScoreboardConfig, ScoreboardError,
    ScoreboardQuery,
};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WEEK3: &str = include_str!("fixtures/scoreboard_week3.html");
const INVALID: &str = include_str!("fixtures/invalid_league.html");
const PRIVATE: &str = include_str!("fixtures/private_league.html");

const LEAGUE: u64 = 1829677;
const SEASON: i32 = 2017;

fn week_page(week: u32) -> String {
    WEEK3.replace("Week 3", &format!("Week {week}"))
}

fn league_for(server: &MockServer) -> League {
    let config = ScoreboardConfig::with_base_url(server.uri());
    League::with_config(LeagueId::from(LEAGUE), &config).unwrap()
}

async fn mount_week(server: &MockServer, week: u32, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/ffl/scoreboard"))
        .and(query_param("leagueId", "1829677"))
        .and(query_param("matchupPeriodId", week.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(week_page(week)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ffl/scoreboard"))
        .and(query_param("leagueId", "1829677"))
        .and(query_param_is_missing("seasonId"))
        .and(query_param_is_missing("matchupPeriodId"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WEEK3))
        .expect(1)
        .mount(&server)
        .await;

    let league = league_for(&server);
    assert_eq!(league.fetch_name().await.unwrap(), "Miami 8-Team 1829677");
    // Served from memory; the mock verifies a single request on drop
    assert_eq!(league.fetch_name().await.unwrap(), "Miami 8-Team 1829677");
}

#[tokio::test]
async fn test_fetch_name_invalid_and_private() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("leagueId", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(INVALID))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("leagueId", "1045334"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PRIVATE))
        .mount(&server)
        .await;

    let config = ScoreboardConfig::with_base_url(server.uri());

    let invalid = League::with_config(LeagueId::from(1), &config).unwrap();
    assert!(matches!(invalid.fetch_name().await, Err(ScoreboardError::InvalidLeague(_))));

    let private = League::with_config(LeagueId::from(1045334), &config).unwrap();
    assert!(matches!(private.fetch_name().await, Err(ScoreboardError::PrivateLeague(_))));
}

#[tokio::test]
async fn test_non_200_is_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let league = league_for(&server);
    assert!(matches!(league.fetch_name().await, Err(ScoreboardError::HttpStatus(503))));
    assert!(matches!(
        league.fetch_week(Some(SEASON), Some(1)).await,
        Err(ScoreboardError::HttpStatus(503))
    ));
}

#[tokio::test]
async fn test_connection_failure_is_transport() {
    let config = ScoreboardConfig::with_base_url("http://127.0.0.1:1");
    let fetcher = HttpPageFetcher::new(&config).unwrap();

    let result = fetcher.fetch(&ScoreboardQuery::league(LeagueId::from(LEAGUE))).await;
    assert!(matches!(result, Err(ScoreboardError::Transport(_))));
}

#[tokio::test]
async fn test_fetch_week_sends_season_and_week() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ffl/scoreboard"))
        .and(query_param("leagueId", "1829677"))
        .and(query_param("seasonId", "2017"))
        .and(query_param("matchupPeriodId", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WEEK3))
        .expect(1)
        .mount(&server)
        .await;

    let scoreboard = league_for(&server).fetch_week(Some(SEASON), Some(3)).await.unwrap();
    assert_eq!(scoreboard.week, 3);
    assert_eq!(scoreboard.teams.len(), 8);
}

#[tokio::test]
async fn test_fetch_weeks_over_http() {
    let server = MockServer::start().await;
    for week in 2..=4 {
        mount_week(&server, week, 1).await;
    }

    let season = league_for(&server).fetch_weeks(2, 4, Some(SEASON)).await.unwrap();
    let weeks: Vec<u32> = season.weeks.iter().map(|w| w.week).collect();
    assert_eq!(weeks, vec![2, 3, 4]);
}

#[tokio::test]
async fn test_fetch_weeks_fails_when_one_week_fails() {
    let server = MockServer::start().await;
    mount_week(&server, 1, 1).await;
    mount_week(&server, 3, 1).await;
    Mock::given(method("GET"))
        .and(query_param("matchupPeriodId", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = league_for(&server).fetch_weeks(1, 3, Some(SEASON)).await;
    assert!(matches!(result, Err(ScoreboardError::HttpStatus(500))));
}

#[tokio::test]
async fn test_fetch_weeks_fails_when_one_week_cannot_connect() {
    // Week 2 goes to a port nothing listens on, the rest to the mock server
    struct SplitFetcher {
        reachable: HttpPageFetcher,
        unreachable: HttpPageFetcher,
    }

    #[async_trait::async_trait]
    impl PageFetcher for SplitFetcher {
        async fn fetch(&self, query: &ScoreboardQuery) -> espn_scoreboard::Result<String> {
            match query.week {
                Some(2) => self.unreachable.fetch(query).await,
                _ => self.reachable.fetch(query).await,
            }
        }
    }

    let server = MockServer::start().await;
    mount_week(&server, 1, 1).await;
    mount_week(&server, 3, 1).await;

    let fetcher = SplitFetcher {
        reachable: HttpPageFetcher::new(&ScoreboardConfig::with_base_url(server.uri())).unwrap(),
        unreachable: HttpPageFetcher::new(&ScoreboardConfig::with_base_url("http://127.0.0.1:1"))
            .unwrap(),
    };
    let league = League::with_fetcher(LeagueId::from(LEAGUE), Arc::new(fetcher));

    let result = league.fetch_weeks(1, 3, Some(SEASON)).await;
    assert!(matches!(result, Err(ScoreboardError::Transport(_))));
}

#[tokio::test]
async fn test_fetch_season_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ffl/scoreboard"))
        .and(query_param_is_missing("matchupPeriodId"))
        .respond_with(ResponseTemplate::new(200).set_body_string(week_page(4)))
        .expect(1)
        .mount(&server)
        .await;
    for week in 1..=3 {
        mount_week(&server, week, 1).await;
    }
    // Current week must come from the first response, not a second request
    mount_week(&server, 4, 0).await;

    let season = league_for(&server).fetch_season().await.unwrap();
    let weeks: Vec<u32> = season.weeks.iter().map(|w| w.week).collect();
    assert_eq!(weeks, vec![1, 2, 3, 4]);
    assert_eq!(season.week(2).map(|w| w.teams.len()), Some(8));
    assert!(season.week(5).is_none());

    let standings = season.standings();
    assert_eq!(standings.len(), 8);
    assert_eq!(standings[0].team_id, "6");
    assert_eq!(standings[0].wins, 4);
}

#[tokio::test]
async fn test_custom_fetcher_can_be_injected() {
    struct Fixed;

    #[async_trait::async_trait]
    impl PageFetcher for Fixed {
        async fn fetch(&self, _query: &ScoreboardQuery) -> espn_scoreboard::Result<String> {
            Ok(WEEK3.to_string())
        }
    }

    let league = League::with_fetcher(LeagueId::from(LEAGUE), Arc::new(Fixed));
    assert_eq!(league.fetch_week(None, Some(3)).await.unwrap().teams.len(), 8);
}
