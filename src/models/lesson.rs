//! # 레슨(Lesson) 모델
//!
//! 레슨은 강의 안에서 `order`로 정렬되는 콘텐츠 단위입니다.
//! 같은 강의 안에서 `order`는 중복될 수 없습니다 (UNIQUE(course_id, sort_order)).
//!
//! `order`가 [`FREE_LESSON_LIMIT`] 이하인 레슨은 수강 신청 없이 미리보기가 가능한
//! **무료 레슨**이고, 나머지는 프리미엄 레슨입니다.

use serde::{Deserialize, Serialize};

use super::double_option;
use crate::services::duration;

/// 무료로 공개되는 앞쪽 레슨 수. 강의별 설정은 없습니다.
pub const FREE_LESSON_LIMIT: i64 = 3;

/// 레슨 엔티티: DB의 `lessons` 테이블 한 행
///
/// `order`는 SQL 예약어라서 컬럼 이름은 `sort_order`를 사용합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Lesson {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub description: String,
    #[sqlx(rename = "sort_order")]
    pub order: i64,
    pub content: String,
    pub video_file: Option<String>,
    pub duration_seconds: i64,
    pub thumbnail: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Lesson {
    /// 앞쪽 3개 레슨은 무료 미리보기
    pub fn is_free(&self) -> bool {
        is_free_order(self.order)
    }

    pub fn duration_formatted(&self) -> String {
        duration::format_seconds(self.duration_seconds)
    }
}

pub fn is_free_order(order: i64) -> bool {
    order <= FREE_LESSON_LIMIT
}

/// 응답용 레슨 표현
///
/// `locked`가 true이면 수강 신청하지 않은 사용자에게 프리미엄 레슨을 보여주는 경우로,
/// `content`와 `video_file`이 비워진 상태입니다.
#[derive(Debug, Clone, Serialize)]
pub struct LessonView {
    #[serde(flatten)]
    pub lesson: Lesson,
    pub is_free: bool,
    pub duration_formatted: String,
    pub locked: bool,
}

impl LessonView {
    /// 전체 내용을 그대로 노출하는 표현 (관리자, 수강생, 무료 레슨)
    pub fn unlocked(lesson: Lesson) -> Self {
        Self {
            is_free: lesson.is_free(),
            duration_formatted: lesson.duration_formatted(),
            lesson,
            locked: false,
        }
    }

    /// 수강 여부에 따라 프리미엄 레슨 본문을 가립니다.
    pub fn for_viewer(mut lesson: Lesson, is_enrolled: bool) -> Self {
        if is_enrolled || lesson.is_free() {
            return Self::unlocked(lesson);
        }
        lesson.content = String::new();
        lesson.video_file = None;
        Self {
            is_free: false,
            duration_formatted: lesson.duration_formatted(),
            lesson,
            locked: true,
        }
    }
}

/// 목록/사이드바용 요약 (본문 제외)
#[derive(Debug, Clone, Serialize)]
pub struct LessonSummary {
    pub id: String,
    pub title: String,
    pub order: i64,
    pub duration_seconds: i64,
    pub duration_formatted: String,
    pub is_free: bool,
}

impl From<&Lesson> for LessonSummary {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id.clone(),
            title: lesson.title.clone(),
            order: lesson.order,
            duration_seconds: lesson.duration_seconds,
            duration_formatted: lesson.duration_formatted(),
            is_free: lesson.is_free(),
        }
    }
}

/// 레슨 생성 요청 (관리자). 강의 ID는 URL 경로에서 가져옵니다.
#[derive(Debug, Deserialize)]
pub struct CreateLessonRequest {
    pub title: String,
    pub description: String,
    pub order: i64,
    #[serde(default)]
    pub content: String,
    pub video_file: Option<String>,
    #[serde(default)]
    pub duration_seconds: i64,
    pub thumbnail: Option<String>,
}

/// 레슨 수정 요청 (부분 업데이트). 다른 강의로 옮기는 것은 지원하지 않습니다.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLessonRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub order: Option<i64>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub video_file: Option<Option<String>>,
    pub duration_seconds: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub thumbnail: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(order: i64) -> Lesson {
        Lesson {
            id: format!("l{}", order),
            course_id: "c".to_string(),
            title: format!("Lesson {}", order),
            description: String::new(),
            order,
            content: "secret".to_string(),
            video_file: Some("course_videos/2026/03/v.mp4".to_string()),
            duration_seconds: 600,
            thumbnail: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn first_three_lessons_are_free() {
        let flags: Vec<bool> = (1..=4).map(|o| lesson(o).is_free()).collect();
        assert_eq!(flags, vec![true, true, true, false]);
    }

    #[test]
    fn premium_lesson_is_locked_for_visitors() {
        let view = LessonView::for_viewer(lesson(4), false);
        assert!(view.locked);
        assert!(view.lesson.content.is_empty());
        assert_eq!(view.lesson.video_file, None);
        assert_eq!(view.duration_formatted, "10 minutes");
    }

    #[test]
    fn enrolled_student_sees_premium_content() {
        let view = LessonView::for_viewer(lesson(7), true);
        assert!(!view.locked);
        assert_eq!(view.lesson.content, "secret");
    }

    #[test]
    fn free_lesson_is_never_locked() {
        let view = LessonView::for_viewer(lesson(2), false);
        assert!(!view.locked);
        assert!(view.is_free);
    }
}
