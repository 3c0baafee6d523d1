// src/models/user.rs

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::challenge::Difficulty;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// User role: 'user' or 'admin'.
    pub role: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username length must be between 3 and 50 characters."
    ))]
    pub username: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "small" => Some(Self::Small),
            "medium" => Some(Self::Medium),
            "large" => Some(Self::Large),
            _ => None,
        }
    }
}

/// Learning preferences shown in the settings panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub font_size: FontSize,
    pub high_contrast: bool,
    pub preferred_difficulty: Option<Difficulty>,
}

/// DTO for updating preferences. Absent fields keep their current value;
/// `"preferred_difficulty": null` clears the preferred difficulty.
#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub font_size: Option<FontSize>,
    pub high_contrast: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub preferred_difficulty: Option<Option<Difficulty>>,
}

/// Marks a field that was in the body, even as `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Preferences {
    pub fn apply(mut self, patch: UpdatePreferencesRequest) -> Self {
        if let Some(font_size) = patch.font_size {
            self.font_size = font_size;
        }
        if let Some(high_contrast) = patch.high_contrast {
            self.high_contrast = high_contrast;
        }
        if let Some(preferred_difficulty) = patch.preferred_difficulty {
            self.preferred_difficulty = preferred_difficulty;
        }
        self
    }
}
