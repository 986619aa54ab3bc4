#![allow(clippy::unwrap_used, clippy::expect_used)]
//! PostgreSQL model and route tests.
//!
//! Posts, comments, moderation reports and users against a live database,
//! both through the models and through the HTTP routes. Skipped unless
//! `DISCOZONE_TEST_DATABASE_URL` is set.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use uuid::Uuid;

use common::{TestApp, test_database, unique_email};
use discozone_kernel::models::{Comment, CreateComment, CreatePost, CreateUser, Post, User};
use discozone_test_utils::assert;

async fn seed_post(pool: &sqlx::PgPool, author: &str) -> Post {
    Post::create(
        pool,
        CreatePost {
            title: format!("post-{}", Uuid::now_v7()),
            author_email: author.to_string(),
            tag: "rock".to_string(),
            up_vote: None,
            down_vote: None,
        },
    )
    .await
    .unwrap()
}

async fn seed_comment(pool: &sqlx::PgPool, post: &Post) -> Comment {
    Comment::create(
        pool,
        CreateComment {
            post_id: post.id,
            post_title: post.title.clone(),
            commenter_email: "reader@model.test".to_string(),
            content: "Nice post".to_string(),
        },
    )
    .await
    .unwrap()
}

// -------------------------------------------------------------------------
// Posts
// -------------------------------------------------------------------------

#[tokio::test]
async fn pg_create_post_defaults_votes() {
    let Some(pool) = test_database().await else {
        return;
    };
    let app = TestApp::with_database(pool.clone());
    let author = unique_email("model.test");

    let (status, body) = app
        .send_json(
            "POST",
            "/posts",
            json!({"title": "Fresh", "authorEmail": author, "tag": "jazz"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let id: Uuid = body["insertedId"].as_str().unwrap().parse().unwrap();
    let post = Post::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(post.title, "Fresh");
    assert_eq!(post.author_email, author);
    assert_eq!(post.up_vote, 0);
    assert_eq!(post.down_vote, 0);

    Post::delete(&pool, id).await.unwrap();
}

#[tokio::test]
async fn pg_delete_post_then_not_found() {
    let Some(pool) = test_database().await else {
        return;
    };
    let app = TestApp::with_database(pool.clone());
    let post = seed_post(&pool, &unique_email("model.test")).await;
    seed_comment(&pool, &post).await;

    let uri = format!("/post/{}", post.id);
    let delete = || Request::delete(uri.as_str()).body(Body::empty()).unwrap();

    let response = app.request(delete()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.request(delete()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert!(Post::find_by_id(&pool, post.id).await.unwrap().is_none());
    let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comment WHERE post_id = $1")
        .bind(post.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orphans, 0);

    assert!(!Post::delete(&pool, post.id).await.unwrap());
}

// -------------------------------------------------------------------------
// Comments and moderation
// -------------------------------------------------------------------------

#[tokio::test]
async fn pg_create_comment_copies_post_title() {
    let Some(pool) = test_database().await else {
        return;
    };
    let app = TestApp::with_database(pool.clone());
    let post = seed_post(&pool, &unique_email("model.test")).await;

    let (status, body) = app
        .send_json(
            "POST",
            "/comments",
            json!({"postId": post.id, "commenterEmail": "r@r.com", "content": "hi"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert::has_key(&body, "insertedId");

    let title: String = sqlx::query_scalar("SELECT post_title FROM comment WHERE post_id = $1")
        .bind(post.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(title, post.title);

    let (status, _) = app
        .send_json(
            "POST",
            "/comments",
            json!({"postId": Uuid::now_v7(), "commenterEmail": "r@r.com", "content": "hi"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Post::delete(&pool, post.id).await.unwrap();
}

#[tokio::test]
async fn pg_report_sets_moderation_fields() {
    let Some(pool) = test_database().await else {
        return;
    };
    let post = seed_post(&pool, &unique_email("model.test")).await;
    let comment = seed_comment(&pool, &post).await;
    assert!(!comment.reported);
    assert!(comment.feedback.is_none());
    assert!(comment.reported_at.is_none());

    let reported = Comment::report(&pool, comment.id, "spam")
        .await
        .unwrap()
        .unwrap();
    assert!(reported.reported);
    assert_eq!(reported.feedback.as_deref(), Some("spam"));
    assert!(reported.reported_at.is_some());

    assert!(
        Comment::report(&pool, Uuid::now_v7(), "spam")
            .await
            .unwrap()
            .is_none()
    );

    Post::delete(&pool, post.id).await.unwrap();
}

#[tokio::test]
async fn pg_report_route_and_queue() {
    let Some(pool) = test_database().await else {
        return;
    };
    let app = TestApp::with_database(pool.clone());
    let post = seed_post(&pool, &unique_email("model.test")).await;
    let first = seed_comment(&pool, &post).await;
    let second = seed_comment(&pool, &post).await;
    let untouched = seed_comment(&pool, &post).await;

    for comment in [&first, &second] {
        let (status, body) = app
            .send_json(
                "PATCH",
                &format!("/comments/{}/report", comment.id),
                json!({"feedback": "off topic"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reported"], true);
        assert_eq!(body["feedback"], "off topic");
        assert::has_key(&body, "reportedAt");
    }

    let (status, _) = app
        .send_json(
            "PATCH",
            &format!("/comments/{}/report", Uuid::now_v7()),
            json!({"feedback": "off topic"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Other runs may share the queue; keep only this post's comments
    let ours = |ids: Vec<Uuid>| -> Vec<Uuid> {
        ids.into_iter()
            .filter(|id| [first.id, second.id, untouched.id].contains(id))
            .collect()
    };

    let queue = Comment::list_reported(&pool, 100, 0).await.unwrap();
    let ids = ours(queue.iter().map(|c| c.id).collect());
    assert_eq!(ids, vec![second.id, first.id]);

    let (status, body) = app.get_json("/comments/reported?perPage=100").await;
    assert_eq!(status, StatusCode::OK);
    let ids = ours(
        assert::string_field(&body, "id")
            .iter()
            .map(|id| id.parse().unwrap())
            .collect(),
    );
    assert_eq!(ids, vec![second.id, first.id]);

    Post::delete(&pool, post.id).await.unwrap();
}

// -------------------------------------------------------------------------
// Users
// -------------------------------------------------------------------------

#[tokio::test]
async fn pg_user_create_ignores_existing_email() {
    let Some(pool) = test_database().await else {
        return;
    };
    let email = unique_email("model.test");

    let created = User::create(
        &pool,
        CreateUser {
            name: "Ada".to_string(),
            email: email.clone(),
            photo_url: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(created.email, email);
    assert_eq!(created.photo_url, "");
    assert!(!created.is_member);

    let again = User::create(
        &pool,
        CreateUser {
            name: "Impostor".to_string(),
            email: email.clone(),
            photo_url: Some("https://example.com/x.png".to_string()),
        },
    )
    .await
    .unwrap();
    assert!(again.is_none());

    let stored = User::find_by_email(&pool, &email).await.unwrap().unwrap();
    assert_eq!(stored.name, "Ada");
    assert_eq!(stored.id, created.id);
}

#[tokio::test]
async fn pg_user_routes() {
    let Some(pool) = test_database().await else {
        return;
    };
    let app = TestApp::with_database(pool);
    let email = unique_email("model.test");
    let body = json!({"name": "Grace", "email": email, "photoURL": "https://example.com/g.png"});

    let (status, created) = app.send_json("POST", "/user", body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "User created");
    assert_eq!(created["user"]["email"], email.as_str());
    assert_eq!(created["user"]["photoURL"], "https://example.com/g.png");

    let (status, existing) = app.send_json("POST", "/user", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(existing["message"], "User already exists");
    assert::lacks_key(&existing, "user");

    let (status, profile) = app.get_json(&format!("/user/{email}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["name"], "Grace");
    assert_eq!(profile["image"], "https://example.com/g.png");
    assert_eq!(profile["badge"], "bronze");
    assert::has_key(&profile, "registeredAt");

    let (status, missing) = app
        .get_json(&format!("/user/{}", unique_email("model.test")))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["error"], "User not found");
}
