use crate::models::ChallengeState;
use chrono::NaiveDate;
use tracing::{info, warn};

pub const CHALLENGE_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeProgress {
    Inactive,
    Active {
        days_passed: u32,
        days_left: u32,
        start_date: NaiveDate,
    },
}

impl ChallengeProgress {
    pub fn is_active(&self) -> bool {
        matches!(self, ChallengeProgress::Active { .. })
    }

    /// Zero while inactive.
    pub fn days_passed(&self) -> u32 {
        match self {
            ChallengeProgress::Inactive => 0,
            ChallengeProgress::Active { days_passed, .. } => *days_passed,
        }
    }

    pub fn fraction(&self) -> f64 {
        f64::from(self.days_passed()) / f64::from(CHALLENGE_DAYS)
    }

    pub fn is_complete(&self) -> bool {
        self.days_passed() >= CHALLENGE_DAYS
    }
}

/// Overwrites the stored start date. Past runs are not archived.
pub fn set_start(challenge: &mut ChallengeState, start: Option<NaiveDate>) {
    match start {
        Some(date) => info!(start = %date, "challenge started"),
        None => info!("challenge cleared"),
    }
    challenge.start_date = start;
}

/// The start date counts as day 1. The count never drops below 1 (a future
/// start date included) and stops at 30 without rolling over.
pub fn progress(challenge: &ChallengeState, today: NaiveDate) -> ChallengeProgress {
    let Some(start_date) = challenge.start_date else {
        return ChallengeProgress::Inactive;
    };

    let elapsed = (today - start_date).num_days() + 1;
    let days_passed = elapsed.clamp(1, i64::from(CHALLENGE_DAYS)) as u32;

    ChallengeProgress::Active {
        days_passed,
        days_left: CHALLENGE_DAYS - days_passed,
        start_date,
    }
}

/// Reads a start date from user input. Blank or unparseable input means no
/// challenge.
pub fn parse_start(input: Option<&str>) -> Option<NaiveDate> {
    let raw = input.map(str::trim).filter(|value| !value.is_empty())?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(err) => {
            warn!(input = raw, "ignoring invalid start date: {err}");
            None
        }
    }
}
