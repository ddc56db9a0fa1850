mod common;

use serde_json::Value;

/// Walks the full lifecycle of forum content: a category is created, a topic
/// is opened inside it, a message is posted, and the delete rules are
/// exercised end to end.
#[tokio::test]
async fn category_topic_message_lifecycle() {
    let app = common::spawn_app().await;

    let (admin_id, admin_token) = common::create_test_user(&app, "admin").await;
    common::make_admin(&app.db, admin_id).await;

    // Category
    let resp = app
        .client
        .post(app.url("/categories"))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({
            "name": "Security",
            "description": "Anything security related"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let category_id = body["data"]["id"].as_i64().unwrap() as i32;

    // Topic inside the category
    let (_user_id, user_token) = common::create_test_user(&app, "member").await;
    let resp = app
        .client
        .post(app.url("/topics"))
        .bearer_auth(&user_token)
        .json(&serde_json::json!({
            "title": "Phishing basics",
            "category_id": category_id
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let topic_id = body["data"]["id"].as_i64().unwrap() as i32;

    // Message inside the topic
    let resp = app
        .client
        .post(app.url("/messages"))
        .bearer_auth(&user_token)
        .json(&serde_json::json!({
            "topic_id": topic_id,
            "content": "Start with the basics"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let message_id = body["data"]["id"].as_i64().unwrap() as i32;

    // Deleting the category is refused while the topic exists
    let resp = app
        .client
        .delete(app.url(&format!("/categories/{}", category_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    // Everything is still intact
    for path in [
        format!("/categories/{}", category_id),
        format!("/topics/{}", topic_id),
        format!("/messages/{}", message_id),
    ] {
        let resp = app.client.get(app.url(&path)).send().await.unwrap();
        assert_eq!(resp.status(), 200, "expected {} to survive", path);
    }

    // Deleting the topic succeeds and takes its messages with it
    let resp = app
        .client
        .delete(app.url(&format!("/topics/{}", topic_id)))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url(&format!("/topics/{}/messages", topic_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);

    let resp = app
        .client
        .get(app.url(&format!("/messages/{}", message_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // With the topic gone the category can be removed
    let resp = app
        .client
        .delete(app.url(&format!("/categories/{}", category_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url(&format!("/categories/{}", category_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

/// Posting activity moves a topic's last activity timestamp forward.
#[tokio::test]
async fn posting_bumps_topic_activity() {
    let app = common::spawn_app().await;

    let (admin_id, admin_token) = common::create_test_user(&app, "admin").await;
    common::make_admin(&app.db, admin_id).await;
    let category_id = common::create_test_category(&app, &admin_token).await;

    let (_user_id, user_token) = common::create_test_user(&app, "poster").await;
    let topic_id = common::create_test_topic(&app, &user_token, category_id).await;

    let resp = app
        .client
        .get(app.url(&format!("/topics/{}", topic_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let before = body["data"]["last_activity_date"]
        .as_str()
        .unwrap()
        .to_string();

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    common::create_test_message(&app, &user_token, topic_id).await;

    let resp = app
        .client
        .get(app.url(&format!("/topics/{}", topic_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let after = body["data"]["last_activity_date"].as_str().unwrap();

    assert!(after > before.as_str());
}
