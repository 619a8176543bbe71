//! The 30-cell "Bike Quest" route drawn from challenge progress.

use crate::challenge::CHALLENGE_DAYS;
use serde::Serialize;

pub const ROWS: usize = 5;
pub const COLS: usize = 6;

pub const LEGEND: &str =
    "🚵 you | 🟩 traveled | ▫️ still ahead | 💧🍎🛌📓🧘 power-ups | 🏰 goal | 👑 reward";

/// Milestone cells and their reward symbols. Cell 30 doubles as the goal.
pub const POWER_UPS: [(u32, &str); 6] = [
    (5, "💧"),
    (10, "🍎"),
    (15, "🛌"),
    (20, "📓"),
    (25, "🧘"),
    (30, "👑"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "cell", rename_all = "snake_case")]
pub enum Tile {
    GoalReached,
    GoalPending,
    Player,
    PowerUp(u32),
    Traveled,
    Empty,
}

impl Tile {
    pub fn symbol(self) -> &'static str {
        match self {
            Tile::GoalReached => "👑",
            Tile::GoalPending => "🏰",
            Tile::Player => "🚵",
            Tile::PowerUp(cell) => power_up(cell).unwrap_or("▫️"),
            Tile::Traveled => "🟩",
            Tile::Empty => "▫️",
        }
    }
}

pub fn power_up(cell: u32) -> Option<&'static str> {
    POWER_UPS
        .iter()
        .find(|(milestone, _)| *milestone == cell)
        .map(|(_, symbol)| *symbol)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub rows: [[Tile; COLS]; ROWS],
}

impl Board {
    /// Tile at a 1-based linear index, row-major. `None` outside 1..=30.
    pub fn cell(&self, index: u32) -> Option<Tile> {
        let i = (index as usize).checked_sub(1)?;
        self.rows.get(i / COLS).map(|row| row[i % COLS])
    }

    pub fn symbols(&self) -> Vec<Vec<&'static str>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|tile| tile.symbol()).collect())
            .collect()
    }

    pub fn to_text(&self) -> String {
        self.symbols()
            .iter()
            .map(|row| row.concat())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn render(days_passed: u32) -> Board {
    let mut rows = [[Tile::Empty; COLS]; ROWS];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, tile) in row.iter_mut().enumerate() {
            let i = (r * COLS + c + 1) as u32;
            *tile = tile_for(i, days_passed);
        }
    }
    Board { rows }
}

fn tile_for(i: u32, days_passed: u32) -> Tile {
    if i == CHALLENGE_DAYS {
        if days_passed >= CHALLENGE_DAYS {
            Tile::GoalReached
        } else {
            Tile::GoalPending
        }
    } else if i == days_passed {
        Tile::Player
    } else if power_up(i).is_some() && i > days_passed {
        Tile::PowerUp(i)
    } else if i < days_passed {
        Tile::Traveled
    } else {
        Tile::Empty
    }
}
