mod request;
mod response;
mod wrapper;

pub use request::*;
pub use response::*;
pub use wrapper::*;

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct UserListParams {
    #[serde(default = "get_default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: u32,
    #[serde(default = "get_default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u32,
}

impl UserListParams {
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct SearchParams {
    #[serde(default)]
    pub username: Option<String>,
}

fn get_default_limit() -> u32 {
    20
}

fn get_default_page() -> u32 {
    1
}
