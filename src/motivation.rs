const CHECKPOINTS: [u32; 5] = [5, 10, 15, 20, 25];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motivation {
    StartChallenge,
    EarlyDays,
    Checkpoint(u32),
    FullDay,
    Halfway,
    OneStep,
}

impl Motivation {
    pub fn message(self) -> String {
        match self {
            Motivation::StartChallenge => {
                "Every change starts with a decision. Set a start date and take the first step today."
                    .to_string()
            }
            Motivation::EarlyDays => {
                "The first days set the rhythm. Keep it simple, calm and consistent.".to_string()
            }
            Motivation::Checkpoint(day) => {
                format!("Checkpoint {day}! Grab the power-up and keep riding 🚵")
            }
            Motivation::FullDay => {
                "Beautiful! Everything done today. The crown is getting closer, same again tomorrow 👑"
                    .to_string()
            }
            Motivation::Halfway => {
                "More than half behind you. A little more and the day is green!".to_string()
            }
            Motivation::OneStep => {
                "You don't have to do everything at once. One thing now, getting started is 80% of it."
                    .to_string()
            }
        }
    }
}

/// First match wins: day checkpoints outrank today's completion.
pub fn select(completed: usize, total: usize, days_passed: u32, challenge_active: bool) -> Motivation {
    if !challenge_active {
        Motivation::StartChallenge
    } else if (1..=3).contains(&days_passed) {
        Motivation::EarlyDays
    } else if CHECKPOINTS.contains(&days_passed) {
        Motivation::Checkpoint(days_passed)
    } else if total > 0 && completed == total {
        Motivation::FullDay
    } else if completed >= (total / 2).max(1) {
        Motivation::Halfway
    } else {
        Motivation::OneStep
    }
}
