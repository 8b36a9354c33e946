//! Pretty output formatting.

use fanclub_cache::{CacheStatus, WarmReport};
use fanclub_core::cache::{CacheStats, MonitorEvent};
use fanclub_core::domain::{ChatMessage, Club, User};

/// Format a user for display.
pub fn format_user(user: &User) -> String {
    let mut output = format!("{}\n  ID: {}\n  Username: {}", user.label(), user.id, user.username);
    if let Some(club) = &user.favorite_club_id {
        output.push_str(&format!("\n  Favorite club: {}", club));
    }
    output
}

/// Format a club for display.
pub fn format_club(club: &Club) -> String {
    let mut output = match &club.sport {
        Some(sport) => format!("{} ({})", club.name, sport),
        None => club.name.clone(),
    };
    output.push_str(&format!("\n  ID: {}\n  Members: {}", club.id, club.member_count));
    if let Some(desc) = &club.description {
        output.push_str(&format!("\n  Description: {}", desc));
    }
    output
}

/// Format clubs for display.
pub fn format_clubs(clubs: &[Club]) -> String {
    if clubs.is_empty() {
        return "No clubs found.".to_string();
    }
    let mut output = format!("CLUBS ({})\n", clubs.len());
    output.push_str(&"-".repeat(40));
    for club in clubs {
        output.push_str(&format!("\n{}", format_club(club)));
        output.push('\n');
    }
    output
}

/// Format one chat message as a single line.
pub fn format_message(message: &ChatMessage) -> String {
    format!(
        "[{}] {}: {}",
        message.sent_at.format("%Y-%m-%d %H:%M"),
        message.sender_id,
        message.body
    )
}

/// Format a room's history for display.
pub fn format_messages(room_id: &str, messages: &[ChatMessage]) -> String {
    if messages.is_empty() {
        return format!("No messages in room {}.", room_id);
    }
    let mut output = format!("ROOM {} ({} messages)\n", room_id, messages.len());
    output.push_str(&"-".repeat(40));
    for message in messages {
        output.push('\n');
        output.push_str(&format_message(message));
    }
    output
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Format the cache status report.
pub fn format_status(status: &CacheStatus) -> String {
    let rooms = if status.chat_rooms_cached.is_empty() {
        "none".to_string()
    } else {
        status.chat_rooms_cached.join(", ")
    };
    format!(
        "Cache Status:\n  User: {}\n  Clubs: {}\n  Chat rooms: {}\n  Queries: {}",
        yes_no(status.user_cached),
        yes_no(status.clubs_cached),
        rooms,
        status.query_count
    )
}

/// Format hit/miss statistics.
pub fn format_stats(stats: &CacheStats) -> String {
    format!(
        "Cache Stats (last {}s):\n  Events: {}\n  Hits: {}\n  Misses: {}\n  Hit ratio: {}",
        stats.window_ms / 1000,
        stats.total_events,
        stats.hits,
        stats.misses,
        stats.hit_ratio
    )
}

/// Format the monitor log, oldest first.
pub fn format_logs(events: &[MonitorEvent]) -> String {
    if events.is_empty() {
        return "No cache activity recorded.".to_string();
    }
    events
        .iter()
        .map(|event| format!("{} {}", event.at.format("%H:%M:%S%.3f"), event.action))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the outcome of a cache warm.
pub fn format_warm(report: &WarmReport) -> String {
    format!(
        "Cache Warm:\n  User: {}\n  Clubs: {}",
        if report.user { "loaded" } else { "failed" },
        if report.clubs { "loaded" } else { "failed" }
    )
}
