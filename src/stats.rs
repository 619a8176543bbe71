use crate::catalog;
use crate::models::{AppData, DailyPoint, DayState, HistoryResponse, WeeklyAveragePoint, WeeklyPoint};
use crate::reconcile::day_key;
use chrono::{Datelike, Duration, Local, NaiveDate};

pub fn build_history(data: &AppData) -> HistoryResponse {
    build_history_at(Local::now().date_naive(), data)
}

/// Completion is counted against each day's own frozen task set. Days with no
/// stored entry count as zero.
pub fn build_history_at(today: NaiveDate, data: &AppData) -> HistoryResponse {
    const WEEK_COUNT: usize = 8;

    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let (completed, total, water_ml) = day_totals(data.days.get(&day_key(date)));
        last_7_days.push(DailyPoint {
            date: day_key(date),
            completed,
            total,
            water_ml,
        });
    }

    let current_week_start = week_start(today);
    let mut weekly_totals = Vec::with_capacity(WEEK_COUNT);
    let mut weekly_averages = Vec::with_capacity(WEEK_COUNT);

    for offset in (0..WEEK_COUNT as i64).rev() {
        let start = current_week_start - Duration::weeks(offset);
        let end = start + Duration::days(6);

        let mut completed_sum = 0usize;
        let mut total_sum = 0usize;
        let mut water_sum = 0u64;
        let mut days_recorded = 0u8;
        for day_offset in 0..7 {
            let date = start + Duration::days(day_offset);
            let Some(day) = data.days.get(&day_key(date)) else {
                continue;
            };
            let (completed, total, water_ml) = day_totals(Some(day));
            completed_sum += completed;
            total_sum += total;
            water_sum = water_sum.saturating_add(u64::from(water_ml));
            days_recorded += 1;
        }

        let days_counted = if today < start {
            0
        } else if today > end {
            7
        } else {
            (today - start).num_days() as u8 + 1
        };
        let denom = if days_counted == 0 { 1.0 } else { f64::from(days_counted) };
        let avg_completion = if total_sum == 0 {
            0.0
        } else {
            completed_sum as f64 / total_sum as f64
        };

        weekly_totals.push(WeeklyPoint {
            week: week_label(start),
            start_date: day_key(start),
            end_date: day_key(end),
            days_recorded,
            completed: completed_sum,
            total: total_sum,
            water_ml: water_sum,
        });

        weekly_averages.push(WeeklyAveragePoint {
            week: week_label(start),
            days_counted,
            avg_completion,
            avg_water_ml: water_sum as f64 / denom,
        });
    }

    HistoryResponse {
        last_7_days,
        weekly_totals,
        weekly_averages,
    }
}

fn day_totals(day: Option<&DayState>) -> (usize, usize, u32) {
    let Some(day) = day else {
        return (0, 0, 0);
    };
    let tasks = catalog::effective_tasks(day.mode);
    let completed = tasks
        .iter()
        .filter(|task| day.done.get(task.name).copied().unwrap_or(false))
        .count();
    (completed, tasks.len(), day.water_ml)
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
