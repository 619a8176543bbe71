use crate::models::Mode;

/// A checklist entry. `name` is the key used in stored completion maps,
/// `id` is the slug the HTTP surface uses to refer to the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Task {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub hint: &'static str,
}

pub const LIGHT_TASKS: &[Task] = &[
    Task {
        id: "meditation",
        name: "Meditation 10–15 min",
        category: "Mind 🧘‍♂️",
        hint: "A short breathing session or a body scan.",
    },
    Task {
        id: "stationary-bike",
        name: "Stationary bike 20–30 min",
        category: "Body 🚴‍♂️",
        hint: "Keep a light heart rate, no need to push.",
    },
    Task {
        id: "sleep",
        name: "Sleep 7–8 h",
        category: "Recovery 😴",
        hint: "Screens off at least 1 h before bed.",
    },
];

pub const EXTRA_TASKS: &[Task] = &[
    Task {
        id: "water-2l",
        name: "2L of water",
        category: "Hydro 💧",
        hint: "Two 1L bottles and you're done.",
    },
    Task {
        id: "walk",
        name: "Walk 20–30 min",
        category: "Body 🚶‍♂️",
        hint: "Fresh air beats scrolling.",
    },
    Task {
        id: "veggie-meal",
        name: "1 fruit-and-veg meal",
        category: "Diet 🍎",
        hint: "A salad or fruit bowl over fast food.",
    },
    Task {
        id: "stretching",
        name: "Stretching 5–10 min",
        category: "Mobility 🧘",
        hint: "Neck, back, hips.",
    },
    Task {
        id: "gratitude-journal",
        name: "Gratitude journal (2–3 sentences)",
        category: "Mind 📓",
        hint: "What was good today?",
    },
    Task {
        id: "no-phone",
        name: "No phone 1 h before bed",
        category: "Sleep hygiene 🌙",
        hint: "A paper book wins.",
    },
    Task {
        id: "no-alcohol",
        name: "30 days without alcohol",
        category: "Habit 🧱",
        hint: "The streak counts day by day.",
    },
];

pub const BONUS_POOL: &[&str] = &[
    "30 squats spread through the day",
    "10 min of back stretching",
    "Swap a sweet drink for water",
    "3-min gratitude meditation",
    "Take the stairs instead of the lift",
];

pub const WATER_GOAL_ML: u32 = 2000;
pub const WATER_STEP_ML: i64 = 250;

/// Tasks active for a day in the given mode, in display order.
pub fn effective_tasks(mode: Mode) -> Vec<&'static Task> {
    let mut tasks: Vec<&'static Task> = LIGHT_TASKS.iter().collect();
    if mode == Mode::Hard {
        tasks.extend(EXTRA_TASKS.iter());
    }
    tasks
}

pub fn find_by_id(id: &str) -> Option<&'static Task> {
    LIGHT_TASKS.iter().chain(EXTRA_TASKS.iter()).find(|task| task.id == id)
}

/// Resolves either a slug or a display name.
pub fn resolve(key: &str) -> Option<&'static Task> {
    let key = key.trim();
    find_by_id(key).or_else(|| {
        LIGHT_TASKS
            .iter()
            .chain(EXTRA_TASKS.iter())
            .find(|task| task.name == key)
    })
}

pub fn pick_bonus<R: rand::Rng + ?Sized>(rng: &mut R) -> String {
    use rand::seq::SliceRandom;

    BONUS_POOL
        .choose(rng)
        .copied()
        .unwrap_or(BONUS_POOL[0])
        .to_string()
}
