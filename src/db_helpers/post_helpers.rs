use sqlx::SqlitePool;

use crate::{
    errors::RequestError,
    models::{Post, Reply, ToggleOutcome},
};

use super::{conflict_on_duplicate, post_exists};

const POSTS_BY_AUTHOR_QUERY: &str = r#"
            SELECT posts.id                                              AS "id",
                   posts.author_id                                       AS "author_id",
                   posts.content                                         AS "content",
                   posts.image                                           AS "image",
                   posts.created_at                                      AS "created_at",
                   posts.updated_at                                      AS "updated_at",
                   (SELECT Count(*)
                    FROM   likes
                    WHERE  likes.post_id = posts.id)                     AS "like_count",
                   (SELECT Count(*)
                    FROM   replies
                    WHERE  replies.post_id = posts.id)                   AS "reply_count",
                   EXISTS (SELECT 1
                           FROM   likes
                           WHERE  likes.post_id = posts.id
                              AND likes.user_id = $2)                    AS "liked_by_me"
            FROM   posts
            WHERE  posts.author_id = $1
            ORDER  BY posts.created_at DESC, posts.id DESC
     "#;

pub async fn insert_post(
    pool: &SqlitePool,
    author_id: i64,
    content: &str,
    image: Option<&str>,
) -> Result<Post, RequestError> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (author_id, content, image)
        VALUES ($1, $2, $3)
        RETURNING id, author_id, content, image, created_at, updated_at,
                  0 AS like_count, 0 AS reply_count, 0 AS liked_by_me
        "#,
    )
    .bind(author_id)
    .bind(content)
    .bind(image)
    .fetch_one(pool)
    .await?;
    Ok(post)
}

/// Posts by `author_id`, newest first, with engagement counts. `liked_by_me`
/// is always false for anonymous viewers.
pub async fn list_posts_by_author(
    pool: &SqlitePool,
    viewer: Option<i64>,
    author_id: i64,
) -> Result<Vec<Post>, RequestError> {
    let posts = sqlx::query_as::<_, Post>(POSTS_BY_AUTHOR_QUERY)
        .bind(author_id)
        .bind(viewer)
        .fetch_all(pool)
        .await?;
    Ok(posts)
}

/// Like counterpart of `toggle_follow_in_db`.
pub async fn toggle_like_in_db(
    pool: &SqlitePool,
    user_id: i64,
    post_id: i64,
) -> Result<ToggleOutcome, RequestError> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND post_id = $2")
        .bind(user_id)
        .bind(post_id)
        .execute(&mut tx)
        .await?
        .rows_affected()
        > 0;

    let active = if removed {
        false
    } else {
        if !post_exists(&mut tx, post_id).await? {
            return Err(RequestError::NotFound("Post not found"));
        }
        sqlx::query("INSERT INTO likes (user_id, post_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(post_id)
            .execute(&mut tx)
            .await
            .map_err(|e| conflict_on_duplicate(e, "Like state changed concurrently"))?;
        true
    };

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(&mut tx)
        .await?;
    tx.commit().await?;

    Ok(ToggleOutcome { active, count })
}

pub async fn insert_reply(
    pool: &SqlitePool,
    author_id: i64,
    post_id: i64,
    content: &str,
) -> Result<Reply, RequestError> {
    let mut tx = pool.begin().await?;
    if !post_exists(&mut tx, post_id).await? {
        return Err(RequestError::NotFound("Post not found"));
    }
    let reply = sqlx::query_as::<_, Reply>(
        r#"
        INSERT INTO replies (author_id, post_id, content)
        VALUES ($1, $2, $3)
        RETURNING id, author_id, post_id, content, created_at
        "#,
    )
    .bind(author_id)
    .bind(post_id)
    .bind(content)
    .fetch_one(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(reply)
}
