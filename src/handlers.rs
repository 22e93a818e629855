use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::{StatusCode, Uri},
    Extension, Json,
};
use sqlx::SqlitePool;

use crate::{
    authentication::{
        hash_password_argon2, verify_password_argon2, AuthUser, JwtKeys, MaybeUser,
    },
    data_formats::{
        AccountResponse, AuthWrapper, CreatePostRequest, CreateReplyRequest, ListedUserResponse,
        LoginRequest, MultiplePostsWrapper, MultipleUsersWrapper, PostResponse, PostWrapper,
        ProfileResponse, RegisterRequest, ReplyResponse, ReplyWrapper, SearchParams,
        ToggleFollowRequest, ToggleFollowResponse, ToggleLikeResponse, UpdateProfileRequest,
        UserListParams, UserResponse, UserWrapper,
    },
    db_helpers::{
        get_profile_in_db, get_user_by_email, insert_post, insert_reply, insert_user,
        list_posts_by_author, list_users_in_db, search_user_in_db, toggle_follow_in_db,
        toggle_like_in_db, update_profile_in_db,
    },
    errors::RequestError,
    validation::{parse_id, require_search_term, ValidatedJson, ValidatedQuery},
    JsonResponse,
};

type JsonResult<T> = Result<Json<T>, RequestError>;
type CreatedResult<T> = Result<JsonResponse<T>, RequestError>;

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> Result<(), (StatusCode, String)> {
    Err((
        StatusCode::NOT_FOUND,
        format!("URL {} provided was not found", uri),
    ))
}

// ----------------- Account Handlers -----------------
pub async fn register_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Extension(keys): Extension<Arc<JwtKeys>>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> CreatedResult<AuthWrapper> {
    let password_hash = hash_password_argon2(request.password).await.map_err(|e| {
        log::error!("Could not hash password: {:#}", e);
        RequestError::ServerError
    })?;
    let user = insert_user(&pool, &request.username, &request.email, &password_hash).await?;
    let token = keys.issue_token(user.id).map_err(|e| {
        log::error!("Could not issue token: {:#}", e);
        RequestError::ServerError
    })?;
    log::info!("Registered user {} ({})", user.id, user.username);
    Ok((
        StatusCode::CREATED,
        Json(AuthWrapper {
            user: AccountResponse::new(user),
            token,
        }),
    ))
}

pub async fn login_user(
    Extension(pool): Extension<Arc<SqlitePool>>,
    Extension(keys): Extension<Arc<JwtKeys>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> JsonResult<AuthWrapper> {
    let user = match get_user_by_email(&pool, &request.email).await? {
        Some(user) => user,
        None => return Err(RequestError::NotAuthorized("Invalid email or password")),
    };
    let is_password_correct = verify_password_argon2(request.password, user.password.clone())
        .await
        .map_err(|e| {
            log::error!("Could not verify password for user {}: {:#}", user.id, e);
            RequestError::ServerError
        })?;
    if !is_password_correct {
        return Err(RequestError::NotAuthorized("Invalid email or password"));
    }
    let token = keys.issue_token(user.id).map_err(|e| {
        log::error!("Could not issue token: {:#}", e);
        RequestError::ServerError
    })?;
    Ok(Json(AuthWrapper {
        user: AccountResponse::new(user),
        token,
    }))
}

// ----------------- User Handlers -----------------
pub async fn list_users(
    Extension(pool): Extension<Arc<SqlitePool>>,
    AuthUser { id }: AuthUser,
    ValidatedQuery(params): ValidatedQuery<UserListParams>,
) -> JsonResult<MultipleUsersWrapper> {
    let users = list_users_in_db(&pool, id, &params).await?;
    Ok(Json(MultipleUsersWrapper {
        users: users.into_iter().map(ListedUserResponse::new).collect(),
        page: params.page,
        limit: params.limit,
    }))
}

pub async fn search_users(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    Query(params): Query<SearchParams>,
) -> JsonResult<ProfileResponse> {
    let term = require_search_term("username", params.username.as_deref())?;
    let profile = search_user_in_db(&pool, maybe_user.get_id(), &term).await?;
    Ok(Json(ProfileResponse::new(profile)))
}

pub async fn get_profile(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    Path(id): Path<String>,
) -> JsonResult<ProfileResponse> {
    let id = parse_id("id", &id)?;
    let profile = get_profile_in_db(&pool, maybe_user.get_id(), id).await?;
    Ok(Json(ProfileResponse::new(profile)))
}

/// Only the account owner may update a profile: the path id has to match the
/// token identity.
pub async fn update_profile(
    Extension(pool): Extension<Arc<SqlitePool>>,
    AuthUser { id: caller }: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> JsonResult<UserWrapper<UserResponse>> {
    let id = parse_id("id", &id)?;
    if id != caller {
        return Err(RequestError::Forbidden("You can only update your own profile"));
    }
    let user = update_profile_in_db(&pool, id, request).await?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user,
    ))))
}

/// Flips the caller's follow edge towards `id`.
///
/// A self-follow is rejected before the token is looked at; after that an
/// anonymous caller gets 401 and a `followerId` other than the token
/// identity gets 403.
pub async fn toggle_follow(
    Extension(pool): Extension<Arc<SqlitePool>>,
    MaybeUser(maybe_user): MaybeUser,
    Path(id): Path<String>,
    ValidatedJson(ToggleFollowRequest { follower_id }): ValidatedJson<ToggleFollowRequest>,
) -> JsonResult<ToggleFollowResponse> {
    let following_id = parse_id("id", &id)?;
    if follower_id == following_id {
        return Err(RequestError::BadRequest("You cannot follow yourself"));
    }
    let caller = match maybe_user {
        Some(AuthUser { id }) => id,
        None => return Err(RequestError::NotAuthorized("Authentication required")),
    };
    if caller != follower_id {
        return Err(RequestError::Forbidden(
            "followerId does not match the authenticated user",
        ));
    }
    let outcome = toggle_follow_in_db(&pool, follower_id, following_id).await?;
    Ok(Json(outcome.into()))
}

pub async fn list_user_posts(
    Extension(pool): Extension<Arc<SqlitePool>>,
    maybe_user: MaybeUser,
    Path(id): Path<String>,
) -> JsonResult<MultiplePostsWrapper> {
    let id = parse_id("id", &id)?;
    let posts = list_posts_by_author(&pool, maybe_user.get_id(), id).await?;
    Ok(Json(MultiplePostsWrapper {
        posts: posts.into_iter().map(PostResponse::new).collect(),
    }))
}
// ----------------- End User Handlers -----------------

// ----------------- Post Handlers -----------------
pub async fn create_post(
    Extension(pool): Extension<Arc<SqlitePool>>,
    AuthUser { id }: AuthUser,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> CreatedResult<PostWrapper<PostResponse>> {
    let post = insert_post(&pool, id, &request.content, request.image.as_deref()).await?;
    Ok((
        StatusCode::CREATED,
        Json(PostWrapper {
            post: PostResponse::new(post),
        }),
    ))
}

pub async fn toggle_like(
    Extension(pool): Extension<Arc<SqlitePool>>,
    AuthUser { id: user_id }: AuthUser,
    Path(id): Path<String>,
) -> JsonResult<ToggleLikeResponse> {
    let post_id = parse_id("id", &id)?;
    let outcome = toggle_like_in_db(&pool, user_id, post_id).await?;
    Ok(Json(outcome.into()))
}

pub async fn create_reply(
    Extension(pool): Extension<Arc<SqlitePool>>,
    AuthUser { id: author_id }: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<CreateReplyRequest>,
) -> CreatedResult<ReplyWrapper<ReplyResponse>> {
    let post_id = parse_id("id", &id)?;
    let reply = insert_reply(&pool, author_id, post_id, &request.content).await?;
    Ok((
        StatusCode::CREATED,
        Json(ReplyWrapper {
            reply: ReplyResponse::new(reply),
        }),
    ))
}
