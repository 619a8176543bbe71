use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Light,
    Hard,
}

impl Mode {
    pub fn from_toggle(hard: bool) -> Self {
        if hard { Mode::Hard } else { Mode::Light }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CardStatus {
    #[serde(rename = "To do")]
    Todo,
    Doing,
    Done,
}

impl CardStatus {
    pub const ALL: [CardStatus; 3] = [CardStatus::Todo, CardStatus::Doing, CardStatus::Done];

    pub fn label(self) -> &'static str {
        match self {
            CardStatus::Todo => "To do",
            CardStatus::Doing => "Doing",
            CardStatus::Done => "Done",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "to do" | "todo" => Some(CardStatus::Todo),
            "doing" => Some(CardStatus::Doing),
            "done" => Some(CardStatus::Done),
            _ => None,
        }
    }
}

/// Card order per kanban column.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BoardOrder {
    #[serde(rename = "To do", default)]
    pub todo: Vec<String>,
    #[serde(rename = "Doing", default)]
    pub doing: Vec<String>,
    #[serde(rename = "Done", default)]
    pub done: Vec<String>,
}

impl BoardOrder {
    pub fn column(&self, status: CardStatus) -> &Vec<String> {
        match status {
            CardStatus::Todo => &self.todo,
            CardStatus::Doing => &self.doing,
            CardStatus::Done => &self.done,
        }
    }

    pub fn column_mut(&mut self, status: CardStatus) -> &mut Vec<String> {
        match status {
            CardStatus::Todo => &mut self.todo,
            CardStatus::Doing => &mut self.doing,
            CardStatus::Done => &mut self.done,
        }
    }
}

/// Recorded state of one calendar date. Fields missing from older documents
/// fall back to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DayState {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub done: BTreeMap<String, bool>,
    #[serde(default)]
    pub water_ml: u32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub bonus: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BTreeMap<String, CardStatus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<BoardOrder>,
}

impl DayState {
    pub fn has_board(&self) -> bool {
        self.status.is_some() || self.order.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ChallengeState {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub goals: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum Layout {
    #[default]
    Classic,
    Kanban,
    Focus,
    Dashboard,
}

impl Layout {
    pub const ALL: [Layout; 4] = [Layout::Classic, Layout::Kanban, Layout::Focus, Layout::Dashboard];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|layout| format!("{layout:?}").eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiPrefs {
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub hard_mode: bool,
}

/// The whole persisted document.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppData {
    #[serde(default)]
    pub days: BTreeMap<String, DayState>,
    #[serde(default)]
    pub challenge: ChallengeState,
    #[serde(default)]
    pub user: UserProfile,
    #[serde(default)]
    pub ui: UiPrefs,
}

#[derive(Debug, Deserialize)]
pub struct ToggleTaskRequest {
    pub task: String,
    pub done: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct WaterRequest {
    pub delta_ml: i64,
}

#[derive(Debug, Deserialize)]
pub struct NotesRequest {
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveCardRequest {
    pub task: String,
    pub status: String,
    pub position: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ChallengeRequest {
    pub start_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub hard: bool,
}

#[derive(Debug, Deserialize)]
pub struct LayoutRequest {
    pub layout: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub name: String,
    #[serde(default)]
    pub goals: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TaskView {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub hint: &'static str,
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CardStatus>,
}

#[derive(Debug, Serialize)]
pub struct ChallengeView {
    pub active: bool,
    pub start_date: Option<String>,
    pub days_passed: u32,
    pub days_left: u32,
    pub fraction: f64,
    pub complete: bool,
}

#[derive(Debug, Serialize)]
pub struct BoardView {
    pub rows: Vec<Vec<&'static str>>,
    pub text: String,
    pub legend: &'static str,
}

#[derive(Debug, Serialize)]
pub struct KanbanView {
    #[serde(rename = "To do")]
    pub todo: Vec<String>,
    #[serde(rename = "Doing")]
    pub doing: Vec<String>,
    #[serde(rename = "Done")]
    pub done: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub done: Vec<&'static str>,
    pub pending: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct TodayView {
    pub date: String,
    pub greeting: String,
    pub mode: Mode,
    pub toggle: Mode,
    pub mode_frozen: bool,
    pub layout: Layout,
    pub tasks: Vec<TaskView>,
    pub completed: usize,
    pub total: usize,
    pub water_ml: u32,
    pub water_goal_ml: u32,
    pub water_fraction: f64,
    pub notes: String,
    pub bonus: String,
    pub challenge: ChallengeView,
    pub board: Option<BoardView>,
    pub motivation: String,
    pub focus: Vec<&'static str>,
    pub dashboard: DashboardView,
    pub kanban: Option<KanbanView>,
    pub storage_warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DailyPoint {
    pub date: String,
    pub completed: usize,
    pub total: usize,
    pub water_ml: u32,
}

#[derive(Debug, Serialize)]
pub struct WeeklyPoint {
    pub week: String,
    pub start_date: String,
    pub end_date: String,
    pub days_recorded: u8,
    pub completed: usize,
    pub total: usize,
    pub water_ml: u64,
}

#[derive(Debug, Serialize)]
pub struct WeeklyAveragePoint {
    pub week: String,
    pub days_counted: u8,
    pub avg_completion: f64,
    pub avg_water_ml: f64,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub last_7_days: Vec<DailyPoint>,
    pub weekly_totals: Vec<WeeklyPoint>,
    pub weekly_averages: Vec<WeeklyAveragePoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_without_mode_reads_as_light() {
        let day: DayState =
            serde_json::from_str(r#"{"done": {"Sleep 7–8 h": true}, "water_ml": 250}"#).unwrap();
        assert_eq!(day.mode, Mode::Light);
        assert_eq!(day.water_ml, 250);
        assert!(!day.has_board());
    }

    #[test]
    fn board_fields_use_column_labels() {
        let mut day = DayState::default();
        day.order = Some(BoardOrder {
            todo: vec!["Walk 20–30 min".into()],
            ..BoardOrder::default()
        });
        day.status = Some(BTreeMap::from([("Walk 20–30 min".to_string(), CardStatus::Todo)]));
        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["order"]["To do"][0], "Walk 20–30 min");
        assert_eq!(json["status"]["Walk 20–30 min"], "To do");
    }

    #[test]
    fn challenge_date_is_iso() {
        let data: AppData =
            serde_json::from_str(r#"{"days": {}, "challenge": {"start_date": "2026-01-05"}}"#)
                .unwrap();
        assert_eq!(data.challenge.start_date, NaiveDate::from_ymd_opt(2026, 1, 5));
        assert_eq!(data.ui.layout, Layout::Classic);
    }

    #[test]
    fn layout_parse_ignores_case() {
        assert_eq!(Layout::parse("kanban"), Some(Layout::Kanban));
        assert_eq!(Layout::parse("Grid"), None);
        assert_eq!(CardStatus::parse("To do"), Some(CardStatus::Todo));
    }
}
