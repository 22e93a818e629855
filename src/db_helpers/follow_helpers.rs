use sqlx::SqlitePool;

use crate::{errors::RequestError, models::ToggleOutcome};

use super::{conflict_on_duplicate, user_exists};

/// Flips the follow edge `follower_id -> following_id` and returns the new
/// state with the target's follower count.
///
/// The delete runs first so the transaction holds the write lock before it
/// looks at anything; a concurrent toggle of the same pair waits for it
/// instead of reading a stale state. If a duplicate insert still slips
/// through, the primary key rejects it and the caller gets a 409.
pub async fn toggle_follow_in_db(
    pool: &SqlitePool,
    follower_id: i64,
    following_id: i64,
) -> Result<ToggleOutcome, RequestError> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
        .bind(follower_id)
        .bind(following_id)
        .execute(&mut tx)
        .await?
        .rows_affected()
        > 0;

    let active = if removed {
        false
    } else {
        if !user_exists(&mut tx, following_id).await? {
            return Err(RequestError::NotFound("User not found"));
        }
        sqlx::query("INSERT INTO follows (follower_id, following_id) VALUES ($1, $2)")
            .bind(follower_id)
            .bind(following_id)
            .execute(&mut tx)
            .await
            .map_err(|e| conflict_on_duplicate(e, "Follow state changed concurrently"))?;
        true
    };

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE following_id = $1")
        .bind(following_id)
        .fetch_one(&mut tx)
        .await?;
    tx.commit().await?;

    log::debug!(
        "User {} {} user {}",
        follower_id,
        if active { "followed" } else { "unfollowed" },
        following_id
    );
    Ok(ToggleOutcome { active, count })
}
