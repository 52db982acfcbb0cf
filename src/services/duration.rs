//! # 재생 시간 표시 유틸리티
//!
//! 초 단위 길이를 사람이 읽기 쉬운 문자열로 바꿉니다.
//! 0이 아닌 가장 큰 단위를 기준으로 표시합니다:
//! - 1시간 이상: `"1 hour 1 minute"`, `"2 hours 0 minutes"`
//! - 1분 이상: `"1 minute"`, `"45 minutes"` (남은 초는 버림)
//! - 그 외: `"0 seconds"`, `"1 second"`, `"59 seconds"`
//!
//! 상태가 없는 순수 함수만 있습니다.

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3600;

fn plural(value: i64, unit: &str) -> String {
    if value == 1 {
        format!("{} {}", value, unit)
    } else {
        format!("{} {}s", value, unit)
    }
}

/// 초 단위 길이를 표시 문자열로 변환합니다. 음수는 0으로 취급합니다.
pub fn format_seconds(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / SECONDS_PER_HOUR;
    let minutes = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;

    if hours > 0 {
        format!("{} {}", plural(hours, "hour"), plural(minutes, "minute"))
    } else if minutes > 0 {
        plural(minutes, "minute")
    } else {
        plural(seconds, "second")
    }
}

/// 강의의 `total_hours`(소수점 둘째 자리까지 저장된 시간)를 표시 문자열로 변환합니다.
///
/// `1.02 * 3600`처럼 부동소수점 곱셈 오차가 생기므로 가장 가까운 초로 맞춘 뒤
/// 정수 나눗셈으로 시/분을 나눕니다.
pub fn format_hours(total_hours: f64) -> String {
    let seconds = (total_hours * SECONDS_PER_HOUR as f64).round() as i64;
    format_seconds(seconds)
}

/// 레슨 길이 합(초)을 `total_hours` 저장값으로 변환합니다: 초 / 3600을 소수 둘째 자리로
///
/// 정수로 계산해서 정확히 반인 값(54초 = 0.015시간)은 항상 올립니다.
pub fn seconds_to_hours(total_seconds: i64) -> f64 {
    let hundredths = (total_seconds * 100 + SECONDS_PER_HOUR / 2).div_euclid(SECONDS_PER_HOUR);
    hundredths as f64 / 100.0
}
