use chrono::Timelike;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Room {
    pub id: &'static str,
    pub label: &'static str,
    pub available: bool,
}

pub const ROOMS: &[Room] = &[
    Room { id: "health", label: "🚵 Health motivator", available: true },
    Room { id: "mind", label: "🧘 Mind", available: false },
    Room { id: "sport", label: "🏋️ Sport", available: false },
    Room { id: "diet", label: "🍎 Diet", available: false },
    Room { id: "study", label: "📚 Study", available: false },
    Room { id: "finance", label: "💸 Finance", available: false },
    Room { id: "social", label: "🤝 Social", available: false },
    Room { id: "order", label: "🧹 Order", available: false },
];

pub fn room(id: &str) -> Option<&'static Room> {
    ROOMS.iter().find(|room| room.id == id)
}

pub fn time_prefix<T: Timelike>(now: &T) -> &'static str {
    match now.hour() {
        5..=11 => "Good morning",
        12..=17 => "Hi",
        _ => "Good evening",
    }
}

/// "anna maria, tom" greets "Anna and Tom": first word of each
/// comma-separated name, capitalized.
pub fn greet(prefix: &str, raw_name: &str) -> String {
    let names: Vec<String> = raw_name
        .split(',')
        .filter_map(|part| part.split_whitespace().next())
        .map(capitalize)
        .collect();

    if names.is_empty() {
        format!("{prefix}! 👋")
    } else {
        format!("{prefix}, {}! 👋", names.join(" and "))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
