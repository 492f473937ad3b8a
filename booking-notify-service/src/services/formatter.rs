//! Turns a booking into the text staff receive on LINE and Messenger.

use crate::models::BookingRequest;
use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Asia::Bangkok;
use std::borrow::Cow;

pub const PLACEHOLDER: &str = "-";
pub const TRUNCATION_MARKER: &str = "...";

const HEADLINE: &str = "แจ้งเตือนนัดหมายใหม่ (เว็บไซต์)";

/// Offset between the Gregorian and Thai Buddhist Era calendars.
const BUDDHIST_ERA_OFFSET: i32 = 543;

/// Build the outbound text. A non-empty `raw_message` wins and is sent
/// trimmed; otherwise the fixed template is filled in, stamped with `now`.
pub fn build_booking_message(booking: &BookingRequest, now: DateTime<Utc>) -> String {
    if let Some(raw) = &booking.raw_message {
        return raw.trim().to_string();
    }

    let field = |value: &Option<String>| value.as_deref().unwrap_or(PLACEHOLDER).to_string();

    [
        HEADLINE.to_string(),
        format!("ผู้ติดต่อ: {}", field(&booking.name)),
        format!("เบอร์โทร: {}", field(&booking.phone)),
        format!("บริการ: {}", field(&booking.service)),
        format!("วันเวลา: {} {}", field(&booking.date), field(&booking.time)),
        format!("พื้นที่: {}", field(&booking.area)),
        format!("รายละเอียด: {}", field(&booking.note)),
        format!("เวลาที่ส่ง: {}", format_bangkok_time(now)),
    ]
    .join("\n")
}

/// Thai short date and medium time in Bangkok, e.g. `19/10/69 21:05:09`.
pub fn format_bangkok_time(now: DateTime<Utc>) -> String {
    let local = now.with_timezone(&Bangkok);
    let buddhist_year = (local.year() + BUDDHIST_ERA_OFFSET).rem_euclid(100);

    format!(
        "{}/{}/{:02} {}",
        local.day(),
        local.month(),
        buddhist_year,
        local.format("%H:%M:%S")
    )
}

/// Cap `text` at `max_chars` characters, ending with `...` when cut.
pub fn truncate_text(text: &str, max_chars: usize) -> Cow<'_, str> {
    if text.chars().count() <= max_chars {
        return Cow::Borrowed(text);
    }

    let marker_len = TRUNCATION_MARKER.chars().count();
    if max_chars <= marker_len {
        return Cow::Owned(TRUNCATION_MARKER.chars().take(max_chars).collect());
    }

    let mut truncated: String = text.chars().take(max_chars - marker_len).collect();
    truncated.push_str(TRUNCATION_MARKER);
    Cow::Owned(truncated)
}
