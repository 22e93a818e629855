use sqlx::SqlitePool;

use crate::{errors::RequestError, models::Profile};

use super::get_user_by_id;

pub async fn count_followers(pool: &SqlitePool, id: i64) -> Result<i64, RequestError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE following_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn count_following(pool: &SqlitePool, id: i64) -> Result<i64, RequestError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Whether `viewer` follows `target`. Anonymous viewers and self-views are
/// never following.
pub async fn is_following(
    pool: &SqlitePool,
    viewer: Option<i64>,
    target: i64,
) -> Result<bool, RequestError> {
    let viewer = match viewer {
        Some(viewer) if viewer != target => viewer,
        _ => return Ok(false),
    };
    let result = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM follows WHERE follower_id = $1 AND following_id = $2
        )
        "#,
    )
    .bind(viewer)
    .bind(target)
    .fetch_one(pool)
    .await?;
    Ok(result)
}

pub async fn get_profile_in_db(
    pool: &SqlitePool,
    viewer: Option<i64>,
    profile_id: i64,
) -> Result<Profile, RequestError> {
    let (user, followers_count, following_count, is_following) = tokio::try_join!(
        get_user_by_id(pool, profile_id),
        count_followers(pool, profile_id),
        count_following(pool, profile_id),
        is_following(pool, viewer, profile_id),
    )?;
    let user = user.ok_or(RequestError::NotFound("User not found"))?;
    Ok(Profile {
        user,
        followers_count,
        following_count,
        is_following,
    })
}
