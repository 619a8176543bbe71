use crate::board::{self, LEGEND};
use crate::catalog::{self, WATER_GOAL_ML};
use crate::challenge::{self, ChallengeProgress};
use crate::greeting;
use crate::models::{
    AppData, BoardView, ChallengeView, DashboardView, DayState, KanbanView, Mode, TaskView,
    TodayView,
};
use crate::motivation;
use crate::reconcile::day_key;
use chrono::NaiveDate;

const FOCUS_SIZE: usize = 3;

/// Derives the page view model. Expects `today` to be reconciled already;
/// a missing entry renders as an empty day in the toggle's mode.
pub fn build(
    data: &AppData,
    today: NaiveDate,
    greeting_prefix: &str,
    storage_warning: Option<String>,
) -> TodayView {
    let toggle = Mode::from_toggle(data.ui.hard_mode);
    let fallback;
    let day = match data.days.get(&day_key(today)) {
        Some(day) => day,
        None => {
            fallback = DayState {
                mode: toggle,
                ..DayState::default()
            };
            &fallback
        }
    };

    let tasks: Vec<TaskView> = catalog::effective_tasks(day.mode)
        .into_iter()
        .map(|task| TaskView {
            id: task.id,
            name: task.name,
            category: task.category,
            hint: task.hint,
            done: day.done.get(task.name).copied().unwrap_or(false),
            status: day
                .status
                .as_ref()
                .and_then(|status| status.get(task.name).copied()),
        })
        .collect();

    let completed = tasks.iter().filter(|task| task.done).count();
    let total = tasks.len();

    let progress = challenge::progress(&data.challenge, today);
    let motivation = motivation::select(
        completed,
        total,
        progress.days_passed(),
        progress.is_active(),
    );

    let board = progress.is_active().then(|| {
        let board = board::render(progress.days_passed());
        BoardView {
            rows: board.symbols(),
            text: board.to_text(),
            legend: LEGEND,
        }
    });

    let focus = tasks
        .iter()
        .filter(|task| !task.done)
        .take(FOCUS_SIZE)
        .map(|task| task.id)
        .collect();

    let dashboard = DashboardView {
        done: tasks.iter().filter(|t| t.done).map(|t| t.name).collect(),
        pending: tasks.iter().filter(|t| !t.done).map(|t| t.name).collect(),
    };

    let kanban = day.order.as_ref().map(|order| KanbanView {
        todo: order.todo.clone(),
        doing: order.doing.clone(),
        done: order.done.clone(),
    });

    TodayView {
        date: day_key(today),
        greeting: greeting::greet(greeting_prefix, &data.user.name),
        mode: day.mode,
        toggle,
        mode_frozen: day.mode != toggle,
        layout: data.ui.layout,
        tasks,
        completed,
        total,
        water_ml: day.water_ml,
        water_goal_ml: WATER_GOAL_ML,
        water_fraction: (f64::from(day.water_ml) / f64::from(WATER_GOAL_ML)).min(1.0),
        notes: day.notes.clone(),
        bonus: day.bonus.clone(),
        challenge: challenge_view(progress),
        board,
        motivation: motivation.message(),
        focus,
        dashboard,
        kanban,
        storage_warning,
    }
}

fn challenge_view(progress: ChallengeProgress) -> ChallengeView {
    match progress {
        ChallengeProgress::Inactive => ChallengeView {
            active: false,
            start_date: None,
            days_passed: 0,
            days_left: challenge::CHALLENGE_DAYS,
            fraction: 0.0,
            complete: false,
        },
        ChallengeProgress::Active {
            days_passed,
            days_left,
            start_date,
        } => ChallengeView {
            active: true,
            start_date: Some(day_key(start_date)),
            days_passed,
            days_left,
            fraction: progress.fraction(),
            complete: progress.is_complete(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LIGHT_TASKS;
    use crate::motivation::Motivation;
    use crate::reconcile::reconcile;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
    }

    #[test]
    fn fresh_challenge_with_two_of_three_done() {
        let mut data = AppData::default();
        data.challenge.start_date = Some(today());
        reconcile(&mut data, today(), Mode::Light, &mut rand::thread_rng());
        let day = data.days.get_mut("2026-02-01").unwrap();
        day.done.insert(LIGHT_TASKS[0].name.to_string(), true);
        day.done.insert(LIGHT_TASKS[1].name.to_string(), true);

        let view = build(&data, today(), "Hi", None);
        assert_eq!((view.completed, view.total), (2, 3));
        assert_eq!(view.motivation, Motivation::EarlyDays.message());
        assert_eq!(view.challenge.days_passed, 1);
        assert_eq!(view.focus, vec![LIGHT_TASKS[2].id]);

        let board = view.board.expect("board while challenge is active");
        let cells: Vec<&str> = board.rows.concat();
        assert_eq!(cells[0], "🚵");
        assert_eq!(cells[29], "🏰");
        for (i, cell) in cells.iter().enumerate().skip(1).take(28) {
            let milestone = crate::board::power_up(i as u32 + 1);
            assert_eq!(*cell, milestone.unwrap_or("▫️"), "cell {}", i + 1);
        }
    }

    #[test]
    fn inactive_challenge_has_no_board() {
        let mut data = AppData::default();
        reconcile(&mut data, today(), Mode::Light, &mut rand::thread_rng());
        let view = build(&data, today(), "Hi", None);
        assert!(view.board.is_none());
        assert!(!view.challenge.active);
        assert_eq!(view.motivation, Motivation::StartChallenge.message());
    }

    #[test]
    fn frozen_mode_is_reported() {
        let mut data = AppData::default();
        reconcile(&mut data, today(), Mode::Light, &mut rand::thread_rng());
        data.ui.hard_mode = true;
        let view = build(&data, today(), "Hi", None);
        assert_eq!(view.mode, Mode::Light);
        assert_eq!(view.toggle, Mode::Hard);
        assert!(view.mode_frozen);
        assert_eq!(view.total, 3);
    }

    #[test]
    fn water_fraction_caps_at_one() {
        let mut data = AppData::default();
        reconcile(&mut data, today(), Mode::Light, &mut rand::thread_rng());
        data.days.get_mut("2026-02-01").unwrap().water_ml = 2750;
        let view = build(&data, today(), "Hi", None);
        assert_eq!(view.water_fraction, 1.0);
    }
}
