//! Brings a day's stored state in line with the task set of its frozen mode.

use crate::catalog::{self, Task};
use crate::models::{AppData, BoardOrder, CardStatus, DayState, Mode};
use chrono::NaiveDate;
use rand::Rng;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    pub created: bool,
    pub changed: bool,
}

pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Makes sure `data` holds a valid entry for `today`.
///
/// A new entry takes its mode from `toggle`. An existing entry keeps the mode
/// it was created with, whatever the toggle says now. Completion flags are
/// only ever added. Board fields, when present, are pruned to the active set
/// and extended with missing tasks in "To do".
pub fn reconcile<R: Rng + ?Sized>(
    data: &mut AppData,
    today: NaiveDate,
    toggle: Mode,
    rng: &mut R,
) -> Reconciled {
    let key = day_key(today);
    let created = !data.days.contains_key(&key);

    let day = data.days.entry(key.clone()).or_insert_with(|| {
        info!(date = %key, mode = ?toggle, "starting a new day");
        new_day(toggle, rng)
    });

    if !created && day.mode != toggle {
        debug!(date = %key, frozen = ?day.mode, toggle = ?toggle, "mode already frozen for today");
    }

    let tasks = catalog::effective_tasks(day.mode);
    let mut changed = created;
    changed |= fill_done(day, &tasks);
    if day.has_board() {
        changed |= sync_board(day, &tasks);
    }

    if changed && !created {
        debug!(date = %key, "day state reconciled");
    }

    Reconciled { created, changed }
}

/// Creates board fields for a day that has none yet, seeding each card's
/// column from its completion flag. Returns whether anything changed.
pub fn ensure_board(day: &mut DayState) -> bool {
    let tasks = catalog::effective_tasks(day.mode);
    let mut changed = false;

    if !day.has_board() {
        let mut status = BTreeMap::new();
        let mut order = BoardOrder::default();
        for task in &tasks {
            let column = if day.done.get(task.name).copied().unwrap_or(false) {
                CardStatus::Done
            } else {
                CardStatus::Todo
            };
            status.insert(task.name.to_string(), column);
            order.column_mut(column).push(task.name.to_string());
        }
        day.status = Some(status);
        day.order = Some(order);
        changed = true;
    }

    changed | sync_board(day, &tasks)
}

fn new_day<R: Rng + ?Sized>(mode: Mode, rng: &mut R) -> DayState {
    DayState {
        mode,
        done: catalog::effective_tasks(mode)
            .iter()
            .map(|task| (task.name.to_string(), false))
            .collect(),
        water_ml: 0,
        notes: String::new(),
        bonus: catalog::pick_bonus(rng),
        status: None,
        order: None,
    }
}

fn fill_done(day: &mut DayState, tasks: &[&Task]) -> bool {
    let mut changed = false;
    for task in tasks {
        if !day.done.contains_key(task.name) {
            day.done.insert(task.name.to_string(), false);
            changed = true;
        }
    }
    changed
}

fn sync_board(day: &mut DayState, tasks: &[&Task]) -> bool {
    let mut changed = day.status.is_none() || day.order.is_none();
    let status = day.status.get_or_insert_with(BTreeMap::new);
    let order = day.order.get_or_insert_with(BoardOrder::default);
    let active: HashSet<&str> = tasks.iter().map(|task| task.name).collect();

    let before = status.len();
    status.retain(|name, _| active.contains(name.as_str()));
    changed |= status.len() != before;

    // A card appears once on the whole board; later duplicates are dropped.
    let mut seen: HashSet<String> = HashSet::new();
    for column in CardStatus::ALL {
        let cards = order.column_mut(column);
        let before = cards.len();
        cards.retain(|name| active.contains(name.as_str()) && seen.insert(name.clone()));
        changed |= cards.len() != before;
    }

    for task in tasks {
        let column = match status.get(task.name) {
            Some(column) => *column,
            None => {
                status.insert(task.name.to_string(), CardStatus::Todo);
                changed = true;
                CardStatus::Todo
            }
        };
        if !order.column(column).iter().any(|name| name == task.name) {
            for other in CardStatus::ALL {
                order.column_mut(other).retain(|name| name != task.name);
            }
            order.column_mut(column).push(task.name.to_string());
            changed = true;
        }
    }

    changed
}
