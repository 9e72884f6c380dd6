use crate::entities::Timestamp;

/// Human readable age of something created at `created_at`.
pub fn time_ago(created_at: Timestamp, now: Timestamp) -> String {
    let seconds = now.duration_since(created_at).whole_seconds();
    let minutes = seconds / 60;
    let hours = seconds / 3_600;
    let days = seconds / 86_400;
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes} min ago")
    } else if hours < 24 {
        format!("{hours} hour{} ago", plural(hours))
    } else {
        format!("{days} day{} ago", plural(days))
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
