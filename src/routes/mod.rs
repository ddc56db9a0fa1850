use crate::handlers;
use crate::middleware::auth::auth_middleware;
use axum::{middleware, routing, Router};

pub fn create_routes() -> Router {
    Router::new().nest("/api/v1", api_routes())
}

fn api_routes() -> Router {
    let auth = auth_routes();
    let public_read = public_read_routes();
    let protected = protected_routes().layer(middleware::from_fn(auth_middleware));

    auth.merge(public_read).merge(protected)
}

fn auth_routes() -> Router {
    Router::new()
        .route("/auth/register", routing::post(handlers::register))
        .route("/auth/login", routing::post(handlers::login))
}

/// Public reads: anyone can browse the forum.
fn public_read_routes() -> Router {
    Router::new()
        // Categories
        .route(
            "/categories",
            routing::get(handlers::category::list_categories),
        )
        .route(
            "/categories/{id}",
            routing::get(handlers::category::get_category),
        )
        .route(
            "/categories/{id}/topics",
            routing::get(handlers::topic::list_topics_in_category),
        )
        // Topics
        .route("/topics", routing::get(handlers::topic::list_topics))
        .route("/topics/{id}", routing::get(handlers::topic::get_topic))
        .route(
            "/topics/{id}/messages",
            routing::get(handlers::message::list_messages),
        )
        // Messages
        .route(
            "/messages/{id}",
            routing::get(handlers::message::get_message),
        )
        // Articles
        .route("/articles", routing::get(handlers::article::list_articles))
        .route(
            "/articles/{id}",
            routing::get(handlers::article::get_article),
        )
        // Users (public profile)
        .route("/users/{id}", routing::get(handlers::user::get_user))
}

/// Authenticated writes.
fn protected_routes() -> Router {
    Router::new()
        .route("/auth/me", routing::get(handlers::get_current_user))
        // Categories (admin only - checked in handler)
        .route(
            "/categories",
            routing::post(handlers::category::create_category),
        )
        .route(
            "/categories/{id}",
            routing::put(handlers::category::update_category)
                .delete(handlers::category::delete_category),
        )
        // Topics
        .route("/topics", routing::post(handlers::topic::create_topic))
        .route(
            "/topics/{id}",
            routing::put(handlers::topic::update_topic).delete(handlers::topic::delete_topic),
        )
        // Messages
        .route(
            "/messages",
            routing::post(handlers::message::create_message),
        )
        .route(
            "/messages/{id}",
            routing::put(handlers::message::update_message)
                .delete(handlers::message::delete_message),
        )
        // Articles
        .route(
            "/articles",
            routing::post(handlers::article::create_article),
        )
        .route(
            "/articles/{id}",
            routing::put(handlers::article::update_article)
                .delete(handlers::article::delete_article),
        )
        // Users (admin list/delete, self or admin update)
        .route("/users", routing::get(handlers::user::list_users))
        .route(
            "/users/{id}",
            routing::put(handlers::user::update_user).delete(handlers::user::delete_user),
        )
}
