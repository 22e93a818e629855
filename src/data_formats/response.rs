use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{ListedUser, Post, Profile, Reply, ToggleOutcome, User};

pub(crate) fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Public view of a user; never carries the email or password hash.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// The caller's own account, returned by register and login.
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub created_at: String,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub followers_count: i64,
    pub following_count: i64,
    pub is_following: bool,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListedUserResponse {
    pub id: i64,
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub created_at: String,
    pub is_following: bool,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFollowResponse {
    pub is_following: bool,
    pub new_follower_count: i64,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToggleLikeResponse {
    pub is_liked: bool,
    pub like_count: i64,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i64,
    pub author_id: i64,
    pub content: String,
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub like_count: i64,
    pub reply_count: i64,
    pub liked_by_me: bool,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub id: i64,
    pub author_id: i64,
    pub post_id: i64,
    pub content: String,
    pub created_at: String,
}

impl UserResponse {
    pub fn new(
        User {
            id,
            username,
            bio,
            image,
            created_at,
            updated_at,
            ..
        }: User,
    ) -> Self {
        UserResponse {
            id,
            username,
            bio,
            image,
            created_at: format_timestamp(&created_at),
            updated_at: format_timestamp(&updated_at),
        }
    }
}

impl AccountResponse {
    pub fn new(
        User {
            id,
            username,
            email,
            bio,
            image,
            created_at,
            ..
        }: User,
    ) -> Self {
        AccountResponse {
            id,
            username,
            email,
            bio,
            image,
            created_at: format_timestamp(&created_at),
        }
    }
}

impl ProfileResponse {
    pub fn new(
        Profile {
            user,
            followers_count,
            following_count,
            is_following,
        }: Profile,
    ) -> Self {
        ProfileResponse {
            user: UserResponse::new(user),
            followers_count,
            following_count,
            is_following,
        }
    }
}

impl ListedUserResponse {
    pub fn new(
        ListedUser {
            id,
            username,
            bio,
            image,
            created_at,
            is_following,
        }: ListedUser,
    ) -> Self {
        ListedUserResponse {
            id,
            username,
            bio,
            image,
            created_at: format_timestamp(&created_at),
            is_following,
        }
    }
}

impl From<ToggleOutcome> for ToggleFollowResponse {
    fn from(ToggleOutcome { active, count }: ToggleOutcome) -> Self {
        ToggleFollowResponse {
            is_following: active,
            new_follower_count: count,
        }
    }
}

impl From<ToggleOutcome> for ToggleLikeResponse {
    fn from(ToggleOutcome { active, count }: ToggleOutcome) -> Self {
        ToggleLikeResponse {
            is_liked: active,
            like_count: count,
        }
    }
}

impl PostResponse {
    pub fn new(
        Post {
            id,
            author_id,
            content,
            image,
            created_at,
            updated_at,
            like_count,
            reply_count,
            liked_by_me,
        }: Post,
    ) -> Self {
        PostResponse {
            id,
            author_id,
            content,
            image,
            created_at: format_timestamp(&created_at),
            updated_at: format_timestamp(&updated_at),
            like_count,
            reply_count,
            liked_by_me,
        }
    }
}

impl ReplyResponse {
    pub fn new(
        Reply {
            id,
            author_id,
            post_id,
            content,
            created_at,
        }: Reply,
    ) -> Self {
        ReplyResponse {
            id,
            author_id,
            post_id,
            content,
            created_at: format_timestamp(&created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn timestamps_are_rendered_as_utc() {
        let timestamp = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(14, 5, 7, 42)
            .unwrap();
        assert_eq!(format_timestamp(&timestamp), "2024-03-09T14:05:07.042Z");
    }

    #[test]
    fn toggle_response_uses_camel_case() {
        let response = ToggleFollowResponse::from(ToggleOutcome {
            active: true,
            count: 1,
        });
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "isFollowing": true, "newFollowerCount": 1 })
        );
    }
}
