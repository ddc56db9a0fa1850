mod common;

use serde_json::Value;

#[tokio::test]
async fn create_category_as_admin() {
    let app = common::spawn_app().await;
    let (admin_id, admin_token) = common::create_test_user(&app, "admin").await;
    common::make_admin(&app.db, admin_id).await;

    let resp = app
        .client
        .post(app.url("/categories"))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({
            "name": "General Discussion",
            "description": "A place for general discussions"
        }))
        .send()
        .await
        .expect("Failed to create category");

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["success"].as_bool().unwrap());
    assert_eq!(body["data"]["name"], "General Discussion");

    // Round-trip: fetch by the returned id
    let id = body["data"]["id"].as_i64().unwrap();
    let resp = app
        .client
        .get(app.url(&format!("/categories/{}", id)))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], "General Discussion");
    assert_eq!(body["data"]["description"], "A place for general discussions");
}

#[tokio::test]
async fn create_category_as_regular_user_fails() {
    let app = common::spawn_app().await;
    let (_user_id, user_token) = common::create_test_user(&app, "regularuser").await;

    let resp = app
        .client
        .post(app.url("/categories"))
        .bearer_auth(&user_token)
        .json(&serde_json::json!({
            "name": "Unauthorized Category"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn duplicate_name_differs_only_in_case() {
    let app = common::spawn_app().await;
    let (admin_id, admin_token) = common::create_test_user(&app, "admin").await;
    common::make_admin(&app.db, admin_id).await;

    let resp = app
        .client
        .post(app.url("/categories"))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "name": "Security" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .post(app.url("/categories"))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({ "name": "SECURITY" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn update_category() {
    let app = common::spawn_app().await;
    let (admin_id, admin_token) = common::create_test_user(&app, "admin").await;
    common::make_admin(&app.db, admin_id).await;

    let id = common::create_test_category(&app, &admin_token).await;

    let resp = app
        .client
        .put(app.url(&format!("/categories/{}", id)))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({
            "id": id,
            "name": "Updated Category Name",
            "description": "Updated description"
        }))
        .send()
        .await
        .expect("Failed to update category");

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Updated Category Name");

    // Verify changes persisted
    let resp = app
        .client
        .get(app.url(&format!("/categories/{}", id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Updated Category Name");
    assert_eq!(body["data"]["description"], "Updated description");
}

#[tokio::test]
async fn update_with_mismatched_id_is_not_found() {
    let app = common::spawn_app().await;
    let (admin_id, admin_token) = common::create_test_user(&app, "admin").await;
    common::make_admin(&app.db, admin_id).await;

    let id = common::create_test_category(&app, &admin_token).await;

    let resp = app
        .client
        .put(app.url(&format!("/categories/{}", id)))
        .bearer_auth(&admin_token)
        .json(&serde_json::json!({
            "id": id + 1,
            "name": "Should Not Apply"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);

    // No partial update happened
    let resp = app
        .client
        .get(app.url(&format!("/categories/{}", id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_ne!(body["data"]["name"], "Should Not Apply");
}

#[tokio::test]
async fn delete_empty_category() {
    let app = common::spawn_app().await;
    let (admin_id, admin_token) = common::create_test_user(&app, "admin").await;
    common::make_admin(&app.db, admin_id).await;

    let id = common::create_test_category(&app, &admin_token).await;

    let resp = app
        .client
        .delete(app.url(&format!("/categories/{}", id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url(&format!("/categories/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn delete_category_with_topics_is_restricted() {
    let app = common::spawn_app().await;
    let (admin_id, admin_token) = common::create_test_user(&app, "admin").await;
    common::make_admin(&app.db, admin_id).await;

    let category_id = common::create_test_category(&app, &admin_token).await;
    let topic_id = common::create_test_topic(&app, &admin_token, category_id).await;

    let resp = app
        .client
        .delete(app.url(&format!("/categories/{}", category_id)))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("topics"));

    // Category and its topic are both still queryable
    let resp = app
        .client
        .get(app.url(&format!("/categories/{}", category_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url(&format!("/topics/{}", topic_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn delete_already_gone_category_succeeds() {
    let app = common::spawn_app().await;
    let (admin_id, admin_token) = common::create_test_user(&app, "admin").await;
    common::make_admin(&app.db, admin_id).await;

    let resp = app
        .client
        .delete(app.url("/categories/999999"))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn list_categories_is_public() {
    let app = common::spawn_app().await;
    let (admin_id, admin_token) = common::create_test_user(&app, "admin").await;
    common::make_admin(&app.db, admin_id).await;

    common::create_test_category(&app, &admin_token).await;
    common::create_test_category(&app, &admin_token).await;

    let resp = app.client.get(app.url("/categories")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().len() >= 2);
}
