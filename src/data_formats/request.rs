use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{validate_not_blank, validate_username};

// ----------------- Account Request -----------------
#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 30, message = "Username must be 3 to 30 characters"))]
    #[validate(custom(
        function = "validate_username",
        message = "Username may only contain letters, digits and underscores"
    ))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

// ----------------- User Request -----------------
#[derive(Deserialize, Serialize, Debug, Default, Validate)]
#[serde(default)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
    #[validate(url(message = "Image must be a valid URL"))]
    pub image: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.bio.is_none() && self.image.is_none()
    }
}

#[derive(Deserialize, Serialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFollowRequest {
    #[validate(range(min = 1, message = "followerId must be a positive integer"))]
    pub follower_id: i64,
}

// ----------------- Post Request -----------------
#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 1000, message = "Content must be 1 to 1000 characters"))]
    #[validate(custom(function = "validate_not_blank", message = "Content must not be blank"))]
    pub content: String,
    #[serde(default)]
    #[validate(url(message = "Image must be a valid URL"))]
    pub image: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct CreateReplyRequest {
    #[validate(length(min = 1, max = 500, message = "Content must be 1 to 500 characters"))]
    #[validate(custom(function = "validate_not_blank", message = "Content must not be blank"))]
    pub content: String,
}
