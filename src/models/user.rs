use serde::{Deserialize, Serialize};

use super::{double_option, EnrolledCourse};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// 관리자 여부. `/admin` 아래 API는 이 값이 true인 사용자만 호출할 수 있습니다.
    pub is_staff: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_staff: user.is_staff,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// 회원가입 시 함께 생성되는 프로필
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub user_id: String,
    pub bio: String,
    pub avatar: Option<String>,
    pub phone: String,
    pub location: String,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

/// `PATCH /profile` 요청. 사용자 계정 필드와 프로필 필드를 함께 받습니다.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub avatar: Option<Option<String>>,
    pub phone: Option<String>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub website: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub linkedin: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub github: Option<Option<String>>,
}

/// `GET /profile` 응답: 계정, 프로필, 수강 통계
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub profile: UserProfile,
    pub enrolled_courses: Vec<EnrolledCourse>,
    pub enrolled_courses_count: i64,
    pub completed_courses_count: i64,
    pub total_lessons: i64,
    pub total_hours: f64,
    pub certificates_count: i64,
}
