mod common;

use serde_json::Value;

#[tokio::test]
async fn register_login_and_me() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .post(app.url("/auth/register"))
        .json(&serde_json::json!({
            "username": "fresh_user",
            "email": "fresh_user@test.com",
            "password": "a_strong_password"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"]["token"].is_string());
    assert_eq!(body["data"]["username"], "fresh_user");

    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({
            "username": "fresh_user",
            "password": "a_strong_password"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let token = body["data"]["token"].as_str().unwrap();

    let resp = app
        .client
        .get(app.url("/auth/me"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["username"], "fresh_user");
    assert_eq!(body["data"]["email"], "fresh_user@test.com");
    assert_eq!(body["data"]["role"], "regular");
}

#[tokio::test]
async fn login_with_wrong_password_fails() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .post(app.url("/auth/register"))
        .json(&serde_json::json!({
            "username": "victim_user",
            "email": "victim_user@test.com",
            "password": "a_strong_password"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({
            "username": "victim_user",
            "password": "wrong_password"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let app = common::spawn_app().await;

    for expected in [200, 409] {
        let resp = app
            .client
            .post(app.url("/auth/register"))
            .json(&serde_json::json!({
                "username": "taken_name",
                "email": format!("taken_{}@test.com", expected),
                "password": "a_strong_password"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), expected);
    }
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = common::spawn_app().await;

    for (name, expected) in [("email_one", 200), ("email_two", 409)] {
        let resp = app
            .client
            .post(app.url("/auth/register"))
            .json(&serde_json::json!({
                "username": name,
                "email": "shared@test.com",
                "password": "a_strong_password"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), expected);
    }
}

#[tokio::test]
async fn short_password_is_rejected() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .post(app.url("/auth/register"))
        .json(&serde_json::json!({
            "username": "short_pw",
            "email": "short_pw@test.com",
            "password": "short"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn banned_user_cannot_login() {
    let app = common::spawn_app().await;
    let (user_id, _token) = common::create_test_user(&app, "banned").await;

    sea_orm::ConnectionTrait::execute(
        &app.db,
        sea_orm::Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "UPDATE users SET is_banned = TRUE WHERE id = $1",
            vec![user_id.into()],
        ),
    )
    .await
    .unwrap();

    let resp = app
        .client
        .get(app.url(&format!("/users/{}", user_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let username = body["data"]["username"].as_str().unwrap().to_string();

    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({
            "username": username,
            "password": "test_password_123"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn me_requires_token() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/auth/me")).send().await.unwrap();
    assert_eq!(resp.status(), 401);

    let resp = app
        .client
        .get(app.url("/auth/me"))
        .bearer_auth("not.a.jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}
