use crate::curve::{svg_path, ControlPoint, IntensityCurve};
use crate::editor::{AddOutcome, PointEditor};
use crate::errors::AppError;
use crate::models::{
    Alarm, AlarmDraft, AlarmUpdate, CurveEditRequest, CurveEditResponse, CurveEvaluateRequest,
    CurveEvaluateResponse, CurveKindRequest, CurvePreviewRequest, CurvePreviewResponse,
    MessageResponse, PointEdit, TimeResponse,
};
use crate::notify::{report, Operation};
use crate::state::AppState;
use crate::storage::persist_store;
use crate::store::AlarmStore;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use chrono::Local;
use tracing::debug;
use uuid::Uuid;

const PREVIEW_WIDTH: f64 = 200.0;
const PREVIEW_HEIGHT: f64 = 100.0;
const MAX_PREVIEW_STEPS: usize = 1000;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let store = state.store.lock().await;
    Html(render_index(store.list(), &state.curves))
}

pub async fn list_alarms(State(state): State<AppState>) -> Json<Vec<Alarm>> {
    let store = state.store.lock().await;
    Json(store.list().to_vec())
}

pub async fn get_alarm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Alarm>, AppError> {
    let store = state.store.lock().await;
    store.get(id).cloned().map(Json)
}

pub async fn create_alarm(
    State(state): State<AppState>,
    Json(draft): Json<AlarmDraft>,
) -> Result<Json<Alarm>, AppError> {
    let result = mutate(&state, |store| store.create(draft)).await;
    report(state.notifier.as_ref(), Operation::Create, result).map(Json)
}

pub async fn update_alarm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<AlarmUpdate>,
) -> Result<Json<Alarm>, AppError> {
    let result = mutate(&state, |store| store.update(id, update)).await;
    report(state.notifier.as_ref(), Operation::Update, result).map(Json)
}

pub async fn toggle_alarm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Alarm>, AppError> {
    let result = mutate(&state, |store| store.toggle(id)).await;
    report(state.notifier.as_ref(), Operation::Update, result).map(Json)
}

pub async fn delete_alarm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let result = mutate(&state, |store| store.delete(id)).await;
    report(state.notifier.as_ref(), Operation::Delete, result)?;
    Ok(Json(MessageResponse {
        message: "Alarm deleted successfully".to_string(),
    }))
}

pub async fn restore_alarm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Alarm>, AppError> {
    let result = mutate(&state, |store| store.restore(id)).await;
    report(state.notifier.as_ref(), Operation::Restore, result).map(Json)
}

pub async fn get_time() -> Json<TimeResponse> {
    let now = Local::now();
    Json(TimeResponse {
        timestamp: now.timestamp() + i64::from(now.offset().local_minus_utc()),
    })
}

pub async fn preview_curve(
    State(state): State<AppState>,
    Json(payload): Json<CurvePreviewRequest>,
) -> Json<CurvePreviewResponse> {
    let steps = payload
        .steps
        .unwrap_or(state.curves.preview_steps)
        .clamp(1, MAX_PREVIEW_STEPS);
    let points: Vec<ControlPoint> = payload
        .curve
        .samples(steps, state.curves.spline_samples)
        .collect();
    let path = svg_path(points.iter().copied(), PREVIEW_WIDTH, PREVIEW_HEIGHT);
    Json(CurvePreviewResponse { points, path })
}

pub async fn evaluate_curve(Json(payload): Json<CurveEvaluateRequest>) -> Json<CurveEvaluateResponse> {
    let t = payload.t.clamp(0.0, 1.0);
    Json(CurveEvaluateResponse {
        t,
        value: payload.curve.value_at(t),
    })
}

pub async fn switch_curve_kind(Json(payload): Json<CurveKindRequest>) -> Json<IntensityCurve> {
    Json(payload.curve.with_kind(payload.kind))
}

pub async fn edit_curve(
    State(state): State<AppState>,
    Json(payload): Json<CurveEditRequest>,
) -> Json<CurveEditResponse> {
    let mut editor = PointEditor::from_curve(&payload.curve, state.curves.snap_radius);

    let touched = match payload.edit {
        PointEdit::Add { x, y } => {
            let outcome = editor.add_point(ControlPoint::new(x, y));
            if let AddOutcome::Grabbed(_) = outcome {
                debug!(x, y, "press snapped to an existing point");
            }
            editor.end_drag();
            Some(outcome.id())
        }
        PointEdit::Move { index, x, y } => {
            let id = editor.id_at(index);
            if let Some(id) = id {
                editor.move_point(id, ControlPoint::new(x, y));
            }
            id
        }
        PointEdit::Delete { index } => {
            editor.delete_at(index);
            None
        }
    };

    Json(CurveEditResponse {
        curve: editor.apply_to(&payload.curve),
        active_index: touched.and_then(|id| editor.position(id)),
    })
}

/// Runs `op` on a copy of the store under the lock. The copy replaces the
/// shared store only once it has been written to disk.
async fn mutate<T>(
    state: &AppState,
    op: impl FnOnce(&mut AlarmStore) -> Result<T, AppError>,
) -> Result<T, AppError> {
    let mut store = state.store.lock().await;
    let mut next = store.clone();
    let value = op(&mut next)?;
    persist_store(&state.data_path, &next).await?;
    debug!(alarms = next.list().len(), "persisted store");
    *store = next;
    Ok(value)
}
