// Text rendering for drafts and letters.

use crate::core::drafts::Draft;
use crate::core::letters::SavedLetter;
use chrono::{DateTime, Datelike, Local, Utc};

const MINUTES_PER_DAY: i64 = 60 * 24;
const MINUTES_PER_MONTH: i64 = MINUTES_PER_DAY * 30;

/// Human distance between `then` and `now`, e.g. "about 3 hours ago".
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 0 {
        return "just now".to_string();
    }

    let minutes = (seconds + 30) / 60;
    match minutes {
        0 => "less than a minute ago".to_string(),
        1 => "1 minute ago".to_string(),
        2..=44 => format!("{} minutes ago", minutes),
        45..=89 => "about 1 hour ago".to_string(),
        90..=1439 => format!("about {} hours ago", (minutes + 30) / 60),
        1440..=2519 => "1 day ago".to_string(),
        2520..=43199 => format!("{} days ago", (minutes + MINUTES_PER_DAY / 2) / MINUTES_PER_DAY),
        43200..=86399 => "about 1 month ago".to_string(),
        _ => {
            let months = calendar_months(then, now);
            if months < 12 {
                let rounded = (minutes + MINUTES_PER_MONTH / 2) / MINUTES_PER_MONTH;
                return format!("{} months ago", rounded);
            }

            let years = months / 12;
            match months % 12 {
                0..=2 => format!("about {} ago", plural_years(years)),
                3..=8 => format!("over {} ago", plural_years(years)),
                _ => format!("almost {} ago", plural_years(years + 1)),
            }
        }
    }
}

/// Whole calendar months from `then` to `now`.
fn calendar_months(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let mut months = i64::from(now.year() - then.year()) * 12 + i64::from(now.month())
        - i64::from(then.month());
    if months > 0 && (now.day(), now.time()) < (then.day(), then.time()) {
        months -= 1;
    }
    months
}

fn plural_years(years: i64) -> String {
    if years == 1 {
        "1 year".to_string()
    } else {
        format!("{} years", years)
    }
}

/// One letter as a small text card.
pub fn letter_card(letter: &SavedLetter, now: DateTime<Utc>) -> String {
    format!(
        "{}\n  Last modified: {}\n  Open in Google Docs: {}",
        letter.name,
        format_relative(letter.modified_at, now),
        letter.view_link
    )
}

pub fn draft_summary(draft: &Draft) -> String {
    let title = if draft.title.is_empty() {
        "(no title)"
    } else {
        draft.title.as_str()
    };

    let mut out = format!("Title: {}\n", title);
    match draft.last_saved_at {
        Some(at) => out.push_str(&format!(
            "Last saved locally: {}\n",
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        )),
        None => out.push_str("Not saved yet\n"),
    }
    out.push('\n');
    out.push_str(if draft.content.is_empty() {
        "(empty)"
    } else {
        draft.content.as_str()
    });
    out
}
