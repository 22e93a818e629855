mod common;

use common::spawn_app;
use serde_json::{json, Value};

#[tokio::test]
async fn posts_are_listed_newest_first_with_counts() {
    let app = spawn_app().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;

    let first = app.create_post(&alice, "first post").await;
    let second = app.create_post(&alice, "second post").await;

    let response = app
        .post_json(&format!("/posts/{}/toggle-like", first), Some(&bob.token), json!({}))
        .await;
    assert_eq!(response.status(), 200);
    let response = app
        .post_json(
            &format!("/posts/{}/replies", first),
            Some(&bob.token),
            json!({ "content": "nice" }),
        )
        .await;
    assert_eq!(response.status(), 201);
    let reply: Value = response.json().await.unwrap();
    assert_eq!(reply["reply"]["postId"], first);
    assert_eq!(reply["reply"]["authorId"], bob.id);

    let body: Value = app
        .get(&format!("/users/{}/posts", alice.id), Some(&bob.token))
        .await
        .json()
        .await
        .unwrap();
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["id"], second);
    assert_eq!(posts[1]["id"], first);
    assert_eq!(posts[1]["likeCount"], 1);
    assert_eq!(posts[1]["replyCount"], 1);
    assert_eq!(posts[1]["likedByMe"], true);
    assert_eq!(posts[0]["likedByMe"], false);

    let body: Value = app
        .get(&format!("/users/{}/posts", alice.id), None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["posts"][1]["likeCount"], 1);
    assert_eq!(body["posts"][1]["likedByMe"], false);
}

#[tokio::test]
async fn toggling_a_like_twice_restores_the_count() {
    let app = spawn_app().await;
    let alice = app.register("alice").await;
    let post = app.create_post(&alice, "like me").await;
    let path = format!("/posts/{}/toggle-like", post);

    let body: Value = app
        .post_json(&path, Some(&alice.token), json!({}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({ "isLiked": true, "likeCount": 1 }));

    let body: Value = app
        .post_json(&path, Some(&alice.token), json!({}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({ "isLiked": false, "likeCount": 0 }));
}

#[tokio::test]
async fn posting_requires_authentication_and_valid_content() {
    let app = spawn_app().await;
    let alice = app.register("alice").await;

    let response = app
        .post_json("/posts", None, json!({ "content": "anonymous" }))
        .await;
    assert_eq!(response.status(), 401);

    let response = app
        .post_json("/posts", Some(&alice.token), json!({ "content": "" }))
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["errors"]["content"].is_array());

    let response = app
        .post_json(
            "/posts",
            Some(&alice.token),
            json!({ "content": "with picture", "image": "not a url" }),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn missing_posts_are_not_found() {
    let app = spawn_app().await;
    let alice = app.register("alice").await;

    let response = app
        .post_json("/posts/77/toggle-like", Some(&alice.token), json!({}))
        .await;
    assert_eq!(response.status(), 404);

    let response = app
        .post_json(
            "/posts/77/replies",
            Some(&alice.token),
            json!({ "content": "hello?" }),
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn listing_posts_validates_the_author_id() {
    let app = spawn_app().await;

    let response = app.get("/users/nope/posts", None).await;
    assert_eq!(response.status(), 400);

    let response = app.get("/users/5/posts", None).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "posts": [] }));
}
