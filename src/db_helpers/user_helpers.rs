use sqlx::SqlitePool;

use crate::{
    data_formats::{UpdateProfileRequest, UserListParams},
    errors::RequestError,
    models::{ListedUser, Profile, User},
};

use super::{conflict_on_duplicate, contains_pattern, get_profile_in_db, get_user_by_id};

pub async fn insert_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, RequestError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password)
        VALUES ($1, $2, $3)
        RETURNING id, username, email, password, bio, image, created_at, updated_at
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| conflict_on_duplicate(e, "Username or email already taken"))?;
    Ok(user)
}

/// Applies a partial profile update. Absent fields keep their stored value;
/// an update with no fields at all reads the record back without writing.
pub async fn update_profile_in_db(
    pool: &SqlitePool,
    id: i64,
    request: UpdateProfileRequest,
) -> Result<User, RequestError> {
    if request.is_empty() {
        return get_user_by_id(pool, id)
            .await?
            .ok_or(RequestError::NotFound("User not found"));
    }

    let UpdateProfileRequest { bio, image } = request;
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET bio        = COALESCE($1, bio),
            image      = COALESCE($2, image),
            updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
        WHERE id = $3
        RETURNING id, username, email, password, bio, image, created_at, updated_at
        "#,
    )
    .bind(bio)
    .bind(image)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    user.ok_or(RequestError::NotFound("User not found"))
}

/// Lists every user except `viewer`, newest accounts first.
pub async fn list_users_in_db(
    pool: &SqlitePool,
    viewer: i64,
    params: &UserListParams,
) -> Result<Vec<ListedUser>, RequestError> {
    let users = sqlx::query_as::<_, ListedUser>(
        r#"
        SELECT users.id,
               users.username,
               users.bio,
               users.image,
               users.created_at,
               EXISTS (SELECT 1
                       FROM   follows
                       WHERE  follows.follower_id = $1
                          AND follows.following_id = users.id) AS is_following
        FROM   users
        WHERE  users.id <> $1
        ORDER  BY users.created_at DESC, users.id DESC
        LIMIT  $2 OFFSET $3
        "#,
    )
    .bind(viewer)
    .bind(i64::from(params.limit))
    .bind(params.offset())
    .fetch_all(pool)
    .await?;
    Ok(users)
}

/// Case-insensitive substring match on username. When several accounts
/// match, the most recently created one is returned.
pub async fn search_user_in_db(
    pool: &SqlitePool,
    viewer: Option<i64>,
    term: &str,
) -> Result<Profile, RequestError> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id FROM users
        WHERE  username LIKE $1 ESCAPE '\'
        ORDER  BY created_at DESC, id DESC
        LIMIT  1
        "#,
    )
    .bind(contains_pattern(term))
    .fetch_optional(pool)
    .await?;

    match id {
        Some(id) => get_profile_in_db(pool, viewer, id).await,
        None => Err(RequestError::NotFound("No user matches that username")),
    }
}
