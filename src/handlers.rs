use crate::board::{self, Board};
use crate::challenge;
use crate::content::{MEDITATION_MINUTES, TOPICS};
use crate::errors::{AppError, QuestError};
use crate::greeting::{ROOMS, Room};
use crate::models::{
    CardStatus, ChallengeRequest, HistoryResponse, Layout, LayoutRequest, ModeRequest,
    MoveCardRequest, NotesRequest, ProfileRequest, TodayView, ToggleTaskRequest, WaterRequest,
};
use crate::catalog::WATER_STEP_ML;
use crate::state::AppState;
use crate::stats::build_history;
use crate::ui::render_index;
use axum::{
    extract::State,
    response::{Html, Redirect},
    Json,
};
use chrono::{Local, NaiveDate, NaiveTime};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RoomsResponse {
    pub rooms: &'static [Room],
    pub meditation_topics: &'static [&'static str],
    pub meditation_minutes: [u32; 4],
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let (today, now) = clock();
    let view = state.run(move |quest| quest.view(today, now)).await?;
    Ok(Html(render_index(&view)))
}

pub async fn get_today(State(state): State<AppState>) -> Result<Json<TodayView>, AppError> {
    let (today, now) = clock();
    Ok(Json(state.run(move |quest| quest.view(today, now)).await?))
}

pub async fn get_board(State(state): State<AppState>) -> Json<Option<Board>> {
    let (today, _) = clock();
    let quest = state.quest.lock().await;
    let progress = quest.progress(today);
    Json(progress.is_active().then(|| board::render(progress.days_passed())))
}

pub async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let quest = state.quest.lock().await;
    Json(build_history(quest.data()))
}

pub async fn get_rooms() -> Json<RoomsResponse> {
    Json(RoomsResponse {
        rooms: ROOMS,
        meditation_topics: TOPICS,
        meditation_minutes: MEDITATION_MINUTES,
    })
}

pub async fn toggle_task(
    State(state): State<AppState>,
    Json(payload): Json<ToggleTaskRequest>,
) -> Result<Json<TodayView>, AppError> {
    let (today, now) = clock();
    let view = state
        .run(move |quest| {
            quest.set_task(today, &payload.task, payload.done)?;
            Ok::<_, QuestError>(quest.view(today, now))
        })
        .await??;
    Ok(Json(view))
}

pub async fn adjust_water(
    State(state): State<AppState>,
    Json(payload): Json<WaterRequest>,
) -> Result<Json<TodayView>, AppError> {
    let (today, now) = clock();
    let view = state
        .run(move |quest| {
            quest.adjust_water(today, payload.delta_ml)?;
            Ok::<_, QuestError>(quest.view(today, now))
        })
        .await??;
    Ok(Json(view))
}

pub async fn save_notes(
    State(state): State<AppState>,
    Json(payload): Json<NotesRequest>,
) -> Result<Json<TodayView>, AppError> {
    let (today, now) = clock();
    let view = state
        .run(move |quest| {
            quest.save_notes(today, payload.notes);
            quest.view(today, now)
        })
        .await?;
    Ok(Json(view))
}

pub async fn move_card(
    State(state): State<AppState>,
    Json(payload): Json<MoveCardRequest>,
) -> Result<Json<TodayView>, AppError> {
    let column = CardStatus::parse(&payload.status)
        .ok_or_else(|| QuestError::UnknownColumn(payload.status.clone()))?;
    let (today, now) = clock();
    let view = state
        .run(move |quest| {
            quest.move_card(today, &payload.task, column, payload.position)?;
            Ok::<_, QuestError>(quest.view(today, now))
        })
        .await??;
    Ok(Json(view))
}

pub async fn set_challenge(
    State(state): State<AppState>,
    Json(payload): Json<ChallengeRequest>,
) -> Result<Json<TodayView>, AppError> {
    let start = challenge::parse_start(payload.start_date.as_deref());
    let (today, now) = clock();
    let view = state
        .run(move |quest| {
            quest.set_challenge_start(today, start);
            quest.view(today, now)
        })
        .await?;
    Ok(Json(view))
}

pub async fn set_mode(
    State(state): State<AppState>,
    Json(payload): Json<ModeRequest>,
) -> Result<Json<TodayView>, AppError> {
    let (today, now) = clock();
    let view = state
        .run(move |quest| {
            quest.set_hard_mode(payload.hard);
            quest.view(today, now)
        })
        .await?;
    Ok(Json(view))
}

pub async fn set_layout(
    State(state): State<AppState>,
    Json(payload): Json<LayoutRequest>,
) -> Result<Json<TodayView>, AppError> {
    let layout = Layout::parse(&payload.layout)
        .ok_or_else(|| QuestError::UnknownLayout(payload.layout.clone()))?;
    let (today, now) = clock();
    let view = state
        .run(move |quest| {
            quest.set_layout(today, layout);
            quest.view(today, now)
        })
        .await?;
    Ok(Json(view))
}

pub async fn save_profile(
    State(state): State<AppState>,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<TodayView>, AppError> {
    let (today, now) = clock();
    let view = state
        .run(move |quest| {
            quest.save_profile(&payload.name, payload.goals)?;
            Ok::<_, QuestError>(quest.view(today, now))
        })
        .await??;
    Ok(Json(view))
}

pub async fn water_add(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let (today, _) = clock();
    state.run(move |quest| quest.adjust_water(today, WATER_STEP_ML)).await??;
    Ok(Redirect::to("/"))
}

pub async fn water_sub(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let (today, _) = clock();
    state.run(move |quest| quest.adjust_water(today, -WATER_STEP_ML)).await??;
    Ok(Redirect::to("/"))
}

pub async fn challenge_today(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let (today, _) = clock();
    state.run(move |quest| quest.set_challenge_start(today, Some(today))).await?;
    Ok(Redirect::to("/"))
}

pub async fn challenge_clear(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let (today, _) = clock();
    state.run(move |quest| quest.set_challenge_start(today, None)).await?;
    Ok(Redirect::to("/"))
}

fn clock() -> (NaiveDate, NaiveTime) {
    let now = Local::now().naive_local();
    (now.date(), now.time())
}
