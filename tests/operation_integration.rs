//! Integration tests for the query and mutation handles.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use quiz_graphql_sdk::prelude::*;

const RANKING: &str = "query Ranking($grade: Int!) { ranking(grade: $grade) { name score } }";
const SUBMIT: &str = "mutation Submit($quizId: ID!, $answer: String!) { submit(quizId: $quizId, answer: $answer) { correct } }";

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct RankingData {
    ranking: Vec<Entry>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct Entry {
    name: String,
    score: u32,
}

fn graphql_url(server: &MockServer) -> String {
    format!("{}/graphql", server.uri())
}

fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}/graphql", addr)
}

fn client(endpoints: &[String]) -> GraphqlClient {
    GraphqlClient::builder()
        .endpoints(endpoints)
        .attempt_timeout(Duration::from_secs(2))
        .token_provider(StaticToken::new("student-token"))
        .build()
        .expect("client should build")
}

fn vars(value: Value) -> Option<Variables> {
    variables(&value).unwrap()
}

async fn ranking_for_grade(server: &MockServer, grade: u32, leader: &str, delay: Duration) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"variables": {"grade": grade}})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"ranking": [{"name": leader, "score": 10}]}}))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

// ─── Query ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_query_idle_until_fetched_then_success() {
    let server = MockServer::start().await;
    ranking_for_grade(&server, 5, "ada", Duration::ZERO).await;

    let client = client(&[graphql_url(&server)]);
    let query = client.query::<RankingData>(RANKING, vars(json!({"grade": 5})), ExecuteOptions::default());

    let initial = query.state().await;
    assert_eq!(initial.status(), Status::Idle);
    assert!(!query.loading().await);
    assert!(server.received_requests().await.unwrap().is_empty());

    let result = query.fetch().await;
    assert_eq!(result.status(), Status::Success);
    assert_eq!(result.data().unwrap().ranking[0].name, "ada");

    assert_eq!(query.data().await.unwrap().ranking[0].score, 10);
    assert!(query.error().await.is_none());
    assert!(!query.loading().await);
}

#[tokio::test]
async fn test_query_error_state_when_all_endpoints_down() {
    let client = client(&[refused_url(), refused_url()]);
    let query = client.query::<RankingData>(RANKING, vars(json!({"grade": 5})), ExecuteOptions::default());

    let result = query.fetch().await;
    assert_eq!(result.status(), Status::Error);
    assert!(result.data().is_none());
    let failures = result.error().unwrap().transport_failures().unwrap();
    assert_eq!(failures.len(), 2);

    let message = query.error().await.unwrap();
    assert!(message.contains("All 2 endpoints unreachable"));
    assert!(query.data().await.is_none());
}

#[tokio::test]
async fn test_query_without_token_errors_with_auth_required() {
    let server = MockServer::start().await;
    let client = GraphqlClient::builder()
        .endpoint(&graphql_url(&server))
        .build()
        .unwrap();
    let query = client.query::<Value>("{ me { id } }", None, ExecuteOptions::default());

    let result = query.fetch().await;
    assert!(result.error().unwrap().is_authentication_required());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sequential_refetch_supersedes() {
    let server = MockServer::start().await;
    ranking_for_grade(&server, 5, "ada", Duration::ZERO).await;
    ranking_for_grade(&server, 6, "grace", Duration::ZERO).await;

    let client = client(&[graphql_url(&server)]);
    let query = client.query::<RankingData>(RANKING, vars(json!({"grade": 5})), ExecuteOptions::default());

    query.fetch().await;
    assert_eq!(query.data().await.unwrap().ranking[0].name, "ada");

    query.refetch(vars(json!({"grade": 6}))).await;
    assert_eq!(query.data().await.unwrap().ranking[0].name, "grace");
    assert_eq!(query.variables().await.unwrap()["grade"], 6);

    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_refetch_without_variables_reuses_previous() {
    let server = MockServer::start().await;
    ranking_for_grade(&server, 5, "ada", Duration::ZERO).await;

    let client = client(&[graphql_url(&server)]);
    let query = client.query::<RankingData>(RANKING, vars(json!({"grade": 5})), ExecuteOptions::default());

    query.fetch().await;
    query.refetch(None).await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body["variables"]["grade"], 5);
    }
}

#[tokio::test]
async fn test_late_result_of_superseded_fetch_is_dropped() {
    let server = MockServer::start().await;
    ranking_for_grade(&server, 5, "slow", Duration::from_millis(400)).await;
    ranking_for_grade(&server, 6, "fast", Duration::ZERO).await;

    let client = client(&[graphql_url(&server)]);
    let query = client.query::<RankingData>(RANKING, vars(json!({"grade": 5})), ExecuteOptions::default());

    let (first, second) = tokio::join!(query.fetch(), query.refetch(vars(json!({"grade": 6}))));

    assert_eq!(first.data().unwrap().ranking[0].name, "slow");
    assert_eq!(second.data().unwrap().ranking[0].name, "fast");
    assert_eq!(query.data().await.unwrap().ranking[0].name, "fast");
}

#[tokio::test]
async fn test_query_success_with_graphql_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": null, "errors": [{"message": "Invalid grade"}]})),
        )
        .mount(&server)
        .await;

    let client = client(&[graphql_url(&server)]);
    let query = client.query::<RankingData>(RANKING, vars(json!({"grade": 99})), ExecuteOptions::default());

    let result = query.fetch().await;
    assert!(result.is_success());
    assert!(result.data().is_none());
    assert_eq!(result.graphql_errors()[0].message, "Invalid grade");
    assert!(result.error().is_none());
}

#[tokio::test]
async fn test_query_sends_operation_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"operationName": "Ranking"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"ranking": []}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&[graphql_url(&server)]);
    let options = ExecuteOptions::default().operation_name("Ranking");
    let query = client.query::<RankingData>(RANKING, vars(json!({"grade": 1})), options);

    let result = query.fetch().await;
    assert!(result.data().unwrap().ranking.is_empty());
}

// ─── Mutation ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct SubmitData {
    submit: Submit,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct Submit {
    correct: bool,
}

#[tokio::test]
async fn test_mutation_forwards_per_call_variables() {
    let server = MockServer::start().await;
    for (answer, correct) in [("4", true), ("5", false)] {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"variables": {"quizId": "q1", "answer": answer}})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"submit": {"correct": correct}}})),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client(&[graphql_url(&server)]);
    let submit = client.mutate::<SubmitData>(SUBMIT, ExecuteOptions::default());
    assert_eq!(submit.state().await.status(), Status::Idle);

    let right = submit.trigger(vars(json!({"quizId": "q1", "answer": "4"}))).await;
    assert!(right.data().unwrap().submit.correct);

    let wrong = submit.trigger(vars(json!({"quizId": "q1", "answer": "5"}))).await;
    assert!(!wrong.data().unwrap().submit.correct);

    // The last call owns the shared state.
    assert!(!submit.data().await.unwrap().submit.correct);
}

#[tokio::test]
async fn test_mutation_reset_returns_to_idle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"submit": {"correct": true}}})),
        )
        .mount(&server)
        .await;

    let client = client(&[graphql_url(&server)]);
    let submit = client.mutate::<SubmitData>(SUBMIT, ExecuteOptions::default());

    submit.trigger(vars(json!({"quizId": "q1", "answer": "4"}))).await;
    assert!(submit.state().await.is_success());

    submit.reset().await;
    let state = submit.state().await;
    assert_eq!(state.status(), Status::Idle);
    assert!(state.data().is_none());
}

#[tokio::test]
async fn test_mutation_error_state_when_unreachable() {
    let client = client(&[refused_url()]);
    let submit = client.mutate::<SubmitData>(SUBMIT, ExecuteOptions::default());

    let result = submit.trigger(vars(json!({"quizId": "q1", "answer": "4"}))).await;
    assert!(result.is_error());
    assert!(submit.error().await.is_some());
    assert!(!submit.loading().await);
}
