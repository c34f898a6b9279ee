//! Study session API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable before running.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use serde_json::Value;

use common::fixtures;
use common::TestContext;

async fn start_session(server: &TestServer, token: &str, set_id: &str, mode: &str) -> Value {
    let response = server
        .post(&format!("/api/sets/{}/sessions", set_id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(token))
        .json(&fixtures::start_request(mode))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

async fn send(server: &TestServer, token: &str, session_id: &str, command: &Value) -> Value {
    let response = server
        .post(&format!("/api/sessions/{}/commands", session_id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(token))
        .json(command)
        .await;
    response.assert_status_ok();
    response.json()
}

/// Correct answer for a test question as shown to the client.
fn answer_for(question: &Value) -> String {
    let prompt = question["prompt"].as_str().unwrap();
    match question["kind"].as_str().unwrap() {
        "true_false" => {
            // "term" means "shown"
            let parts: Vec<&str> = prompt.split('"').collect();
            let (term, shown) = (parts[1], parts[3]);
            if fixtures::definition_of(term) == shown {
                "True".to_string()
            } else {
                "False".to_string()
            }
        }
        _ => fixtures::definition_of(prompt).to_string(),
    }
}

/// Test learn session answered perfectly completes with full score.
#[tokio::test]
#[ignore = "requires database"]
async fn test_learn_session_perfect_run() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let set_id = ctx.create_study_set(&user_id, false, &fixtures::CAPITALS[..4]).await;

    let start = start_session(&server, &token, &set_id, "learn").await;
    let session_id = start["session_id"].as_str().unwrap().to_string();
    assert_eq!(start["mode"], "learn");
    assert_eq!(start["view"]["total"], 4);

    let mut view = start["view"].clone();
    let mut last = Value::Null;
    for _ in 0..4 {
        let options = view["options"].as_array().unwrap();
        assert_eq!(options.len(), 4);
        let prompt = view["prompt"].as_str().unwrap();

        let answered = send(&server, &token, &session_id, &fixtures::answer(fixtures::definition_of(prompt))).await;
        assert_eq!(answered["outcome"]["feedback"]["correct"], true);

        last = send(&server, &token, &session_id, &fixtures::next()).await;
        view = last["view"].clone();
    }

    assert_eq!(last["view"]["completed"], true);
    assert_eq!(last["outcome"]["result"]["score"], 4);
    assert_eq!(last["outcome"]["result"]["total_questions"], 4);
    assert_eq!(ctx.wait_for_results(&user_id, &set_id, 1).await, 1);
    assert_eq!(ctx.wait_for_activities(&set_id, "completed", 1).await, 1);

    ctx.cleanup_user(&user_id).await;
}

/// Test answering the same learn question twice is rejected.
#[tokio::test]
#[ignore = "requires database"]
async fn test_learn_double_answer_conflict() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let set_id = ctx.create_study_set(&user_id, false, &fixtures::CAPITALS[..3]).await;

    let start = start_session(&server, &token, &set_id, "learn").await;
    let session_id = start["session_id"].as_str().unwrap();

    send(&server, &token, session_id, &fixtures::answer("anything")).await;
    let response = server
        .post(&format!("/api/sessions/{}/commands", session_id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::answer("again"))
        .await;
    response.assert_status(StatusCode::CONFLICT);

    ctx.cleanup_user(&user_id).await;
}

/// Test full test-mode flow with a review after submission.
#[tokio::test]
#[ignore = "requires database"]
async fn test_test_session_submit() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let set_id = ctx.create_study_set(&user_id, false, fixtures::CAPITALS).await;

    let start = start_session(&server, &token, &set_id, "test").await;
    let session_id = start["session_id"].as_str().unwrap().to_string();
    let questions = start["view"]["questions"].as_array().unwrap().clone();
    assert_eq!(questions.len(), 7);
    assert_eq!(start["view"]["review"], Value::Null);

    // Leave the last question unanswered
    for (index, question) in questions.iter().enumerate().take(6) {
        send(&server, &token, &session_id, &fixtures::answer_at(index, &answer_for(question))).await;
    }

    let submitted = send(&server, &token, &session_id, &fixtures::submit()).await;
    assert_eq!(submitted["outcome"]["result"]["score"], 6);
    assert_eq!(submitted["outcome"]["result"]["total_questions"], 7);

    let review = submitted["view"]["review"].as_array().unwrap();
    assert_eq!(review.len(), 7);
    assert_eq!(review[6]["correct"], false);
    assert_eq!(review[6]["user_answer"], Value::Null);

    // Completed sessions only accept restart
    let response = server
        .post(&format!("/api/sessions/{}/commands", session_id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::submit())
        .await;
    response.assert_status(StatusCode::CONFLICT);

    let restarted = send(&server, &token, &session_id, &fixtures::restart()).await;
    assert_eq!(restarted["view"]["completed"], false);
    assert_eq!(restarted["view"]["review"], Value::Null);

    ctx.cleanup_user(&user_id).await;
}

/// Test match mode completes once every pair is matched.
#[tokio::test]
#[ignore = "requires database"]
async fn test_match_session_complete() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let set_id = ctx.create_study_set(&user_id, false, fixtures::CAPITALS).await;

    let start = start_session(&server, &token, &set_id, "match").await;
    let session_id = start["session_id"].as_str().unwrap().to_string();
    // Seven cards, at most six pairs on the board
    assert_eq!(start["view"]["total_pairs"], 6);
    assert_eq!(start["view"]["items"].as_array().unwrap().len(), 12);

    let mut last = Value::Null;
    for pair in 0..6 {
        let selected = send(&server, &token, &session_id, &fixtures::click(&format!("term-{}", pair))).await;
        assert_eq!(selected["outcome"]["click"]["outcome"], "selected");
        last = send(&server, &token, &session_id, &fixtures::click(&format!("def-{}", pair))).await;
        assert_eq!(last["outcome"]["click"]["outcome"], "matched");
    }

    assert_eq!(last["view"]["matched_pairs"], 6);
    assert_eq!(last["outcome"]["result"]["score"], 6);
    assert_eq!(last["outcome"]["result"]["total_questions"], 6);

    ctx.cleanup_user(&user_id).await;
}

/// Test match mode refuses a one-card deck.
#[tokio::test]
#[ignore = "requires database"]
async fn test_match_needs_two_cards() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let set_id = ctx.create_study_set(&user_id, false, &fixtures::CAPITALS[..1]).await;

    let response = server
        .post(&format!("/api/sets/{}/sessions", set_id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::start_request("match"))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"], "insufficient_data");

    ctx.cleanup_user(&user_id).await;
}

/// Test sessions are private to the user who started them and can be discarded.
#[tokio::test]
#[ignore = "requires database"]
async fn test_session_ownership_and_discard() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (owner_id, owner_token) = ctx.create_test_user().await;
    let (other_id, other_token) = ctx.create_test_user().await;
    let set_id = ctx.create_study_set(&owner_id, true, fixtures::CAPITALS).await;

    let start = start_session(&server, &owner_token, &set_id, "flashcards").await;
    let session_id = start["session_id"].as_str().unwrap().to_string();
    let path = format!("/api/sessions/{}", session_id);

    server
        .get(&path)
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&other_token))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let fetched: Value = server
        .get(&path)
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&owner_token))
        .await
        .json();
    assert_eq!(fetched["view"]["term"], "Paris");
    assert_eq!(fetched["view"]["definition"], Value::Null);

    server
        .delete(&path)
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&owner_token))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get(&path)
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&owner_token))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup_user(&other_id).await;
    ctx.cleanup_user(&owner_id).await;
}
