//! The session state object. Each user intent reconciles today, mutates the
//! document in memory and writes the whole document back.

use crate::catalog::{self, Task};
use crate::challenge::{self, ChallengeProgress};
use crate::errors::QuestError;
use crate::greeting;
use crate::models::{AppData, CardStatus, DayState, Layout, Mode, TodayView};
use crate::reconcile::{self, day_key};
use crate::storage::Persistence;
use crate::view;
use chrono::{NaiveDate, NaiveTime};
use tracing::{error, info};

pub struct QuestService {
    store: Box<dyn Persistence>,
    data: AppData,
    write_error: Option<String>,
}

impl QuestService {
    pub fn open(store: Box<dyn Persistence>) -> Self {
        let data = store.load();
        info!(days = data.days.len(), "quest data loaded");
        Self {
            store,
            data,
            write_error: None,
        }
    }

    pub fn data(&self) -> &AppData {
        &self.data
    }

    pub fn toggle(&self) -> Mode {
        Mode::from_toggle(self.data.ui.hard_mode)
    }

    /// Message from the last failed write, cleared by the next good one.
    pub fn storage_warning(&self) -> Option<&str> {
        self.write_error.as_deref()
    }

    /// Reconciled state for `today`. Writes only when reconciliation changed
    /// something.
    pub fn today(&mut self, today: NaiveDate) -> &DayState {
        if self.sync_today(today) {
            self.persist();
        }
        &self.data.days[&day_key(today)]
    }

    pub fn view(&mut self, today: NaiveDate, now: NaiveTime) -> TodayView {
        self.today(today);
        view::build(
            &self.data,
            today,
            greeting::time_prefix(&now),
            self.write_error.clone(),
        )
    }

    pub fn progress(&self, today: NaiveDate) -> ChallengeProgress {
        challenge::progress(&self.data.challenge, today)
    }

    /// Sets a task's completion flag, or flips it when `done` is `None`.
    pub fn set_task(
        &mut self,
        today: NaiveDate,
        key: &str,
        done: Option<bool>,
    ) -> Result<bool, QuestError> {
        self.sync_today(today);
        let day = self.day_mut(today);
        let task = active_task(day, key)?;

        let value = done.unwrap_or(!day.done.get(task.name).copied().unwrap_or(false));
        day.done.insert(task.name.to_string(), value);

        if day.has_board() {
            let current = day
                .status
                .as_ref()
                .and_then(|status| status.get(task.name).copied());
            match (value, current) {
                (true, Some(column)) if column != CardStatus::Done => {
                    place_card(day, task.name, CardStatus::Done, None)
                }
                (false, Some(CardStatus::Done)) => {
                    place_card(day, task.name, CardStatus::Todo, None)
                }
                _ => {}
            }
        }

        self.persist();
        Ok(value)
    }

    /// Applies a signed change to today's water, never going below zero.
    pub fn adjust_water(&mut self, today: NaiveDate, delta_ml: i64) -> Result<u32, QuestError> {
        if delta_ml == 0 {
            return Err(QuestError::InvalidWaterDelta);
        }
        self.sync_today(today);
        let day = self.day_mut(today);
        let next = i64::from(day.water_ml)
            .saturating_add(delta_ml)
            .clamp(0, i64::from(u32::MAX));
        day.water_ml = next as u32;
        let water = day.water_ml;
        self.persist();
        Ok(water)
    }

    pub fn save_notes(&mut self, today: NaiveDate, notes: String) {
        self.sync_today(today);
        self.day_mut(today).notes = notes;
        self.persist();
    }

    /// Moves a card to `column` at `position` (appended when absent or past the
    /// end). The completion flag follows the column.
    pub fn move_card(
        &mut self,
        today: NaiveDate,
        key: &str,
        column: CardStatus,
        position: Option<usize>,
    ) -> Result<(), QuestError> {
        self.sync_today(today);
        let day = self.day_mut(today);
        let task = active_task(day, key)?;
        reconcile::ensure_board(day);
        place_card(day, task.name, column, position);
        self.persist();
        Ok(())
    }

    pub fn set_challenge_start(
        &mut self,
        today: NaiveDate,
        start: Option<NaiveDate>,
    ) -> ChallengeProgress {
        challenge::set_start(&mut self.data.challenge, start);
        self.persist();
        self.progress(today)
    }

    /// Only affects days not created yet.
    pub fn set_hard_mode(&mut self, hard: bool) {
        self.data.ui.hard_mode = hard;
        self.persist();
    }

    pub fn set_layout(&mut self, today: NaiveDate, layout: Layout) {
        self.data.ui.layout = layout;
        if layout == Layout::Kanban {
            self.sync_today(today);
        }
        self.persist();
    }

    pub fn save_profile(&mut self, name: &str, goals: Vec<String>) -> Result<(), QuestError> {
        if let Some(unknown) = goals.iter().find(|goal| greeting::room(goal).is_none()) {
            return Err(QuestError::UnknownRoom(unknown.clone()));
        }
        self.data.user.name = name.trim().to_string();
        self.data.user.goals = goals;
        self.persist();
        Ok(())
    }

    fn sync_today(&mut self, today: NaiveDate) -> bool {
        let toggle = self.toggle();
        let result = reconcile::reconcile(&mut self.data, today, toggle, &mut rand::thread_rng());
        let mut changed = result.changed;
        if self.data.ui.layout == Layout::Kanban {
            changed |= reconcile::ensure_board(self.day_mut(today));
        }
        changed
    }

    fn day_mut(&mut self, today: NaiveDate) -> &mut DayState {
        self.data.days.entry(day_key(today)).or_default()
    }

    fn persist(&mut self) {
        match self.store.save(&self.data) {
            Ok(()) => self.write_error = None,
            Err(err) => {
                error!("failed to persist quest data: {err}");
                self.write_error = Some(err.to_string());
            }
        }
    }
}

fn active_task(day: &DayState, key: &str) -> Result<&'static Task, QuestError> {
    let task = catalog::resolve(key).ok_or_else(|| QuestError::UnknownTask(key.to_string()))?;
    if catalog::effective_tasks(day.mode)
        .iter()
        .any(|active| active.id == task.id)
    {
        Ok(task)
    } else {
        Err(QuestError::InactiveTask(task.name.to_string()))
    }
}

fn place_card(day: &mut DayState, name: &str, column: CardStatus, position: Option<usize>) {
    let order = day.order.get_or_insert_with(Default::default);
    for status in CardStatus::ALL {
        order.column_mut(status).retain(|card| card != name);
    }
    let cards = order.column_mut(column);
    let at = position.unwrap_or(cards.len()).min(cards.len());
    cards.insert(at, name.to_string());

    day.status
        .get_or_insert_with(Default::default)
        .insert(name.to_string(), column);
    day.done.insert(name.to_string(), column == CardStatus::Done);
}
