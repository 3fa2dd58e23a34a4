use crate::curve::{ControlPoint, CurveKind, IntensityCurve, MAX_HYPER_PARAMETER};
use crate::errors::AppError;
use crate::recurrence::RecurrencePattern;
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_ALARM_COLOR: &str = "#4CAF50";
pub const DEFAULT_ALARM_LENGTH: u32 = 15;
pub const DEFAULT_ALARM_TIME: &str = "08:00";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    pub id: Uuid,
    pub name: String,
    pub time: String,
    pub color: String,
    pub length: u32,
    pub intensity_curve: IntensityCurve,
    pub is_active: bool,
    pub recurrence: RecurrencePattern,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_time")]
    pub time: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_length")]
    pub length: u32,
    #[serde(default)]
    pub intensity_curve: IntensityCurve,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub recurrence: RecurrencePattern,
}

impl Default for AlarmDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            time: default_time(),
            color: default_color(),
            length: default_length(),
            intensity_curve: IntensityCurve::default(),
            is_active: default_active(),
            recurrence: RecurrencePattern::default(),
        }
    }
}

impl AlarmDraft {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_time(&self.time)?;
        validate_color(&self.color)?;
        validate_length(self.length)?;
        validate_curve(&self.intensity_curve)
    }

    pub fn into_alarm(mut self, id: Uuid, now: DateTime<Utc>) -> Alarm {
        self.intensity_curve.sort_control_points();
        Alarm {
            id,
            name: self.name.trim().to_string(),
            time: self.time,
            color: self.color,
            length: self.length,
            intensity_curve: self.intensity_curve,
            is_active: self.is_active,
            recurrence: self.recurrence,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmUpdate {
    pub name: Option<String>,
    pub time: Option<String>,
    pub color: Option<String>,
    pub length: Option<u32>,
    pub intensity_curve: Option<IntensityCurve>,
    pub is_active: Option<bool>,
    pub recurrence: Option<RecurrencePattern>,
}

impl AlarmUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(time) = &self.time {
            validate_time(time)?;
        }
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        if let Some(length) = self.length {
            validate_length(length)?;
        }
        if let Some(curve) = &self.intensity_curve {
            validate_curve(curve)?;
        }
        Ok(())
    }

    pub fn apply(self, alarm: &mut Alarm, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            alarm.name = name.trim().to_string();
        }
        if let Some(time) = self.time {
            alarm.time = time;
        }
        if let Some(color) = self.color {
            alarm.color = color;
        }
        if let Some(length) = self.length {
            alarm.length = length;
        }
        if let Some(mut curve) = self.intensity_curve {
            curve.sort_control_points();
            alarm.intensity_curve = curve;
        }
        if let Some(is_active) = self.is_active {
            alarm.is_active = is_active;
        }
        if let Some(recurrence) = self.recurrence {
            alarm.recurrence = recurrence;
        }
        alarm.updated_at = now;
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TimeResponse {
    pub timestamp: i64,
}

#[derive(Debug, Deserialize)]
pub struct CurvePreviewRequest {
    pub curve: IntensityCurve,
    pub steps: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CurvePreviewResponse {
    pub points: Vec<ControlPoint>,
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct CurveEvaluateRequest {
    pub curve: IntensityCurve,
    pub t: f64,
}

#[derive(Debug, Serialize)]
pub struct CurveEvaluateResponse {
    pub t: f64,
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub struct CurveKindRequest {
    pub curve: IntensityCurve,
    pub kind: CurveKind,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PointEdit {
    Add { x: f64, y: f64 },
    Move { index: usize, x: f64, y: f64 },
    Delete { index: usize },
}

#[derive(Debug, Deserialize)]
pub struct CurveEditRequest {
    pub curve: IntensityCurve,
    pub edit: PointEdit,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveEditResponse {
    pub curve: IntensityCurve,
    /// Index of the touched point in the re-sorted sequence.
    pub active_index: Option<usize>,
}

fn default_time() -> String {
    DEFAULT_ALARM_TIME.to_string()
}

fn default_color() -> String {
    DEFAULT_ALARM_COLOR.to_string()
}

fn default_length() -> u32 {
    DEFAULT_ALARM_LENGTH
}

fn default_active() -> bool {
    true
}

fn validate_time(time: &str) -> Result<(), AppError> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map(|_| ())
        .map_err(|_| AppError::bad_request(format!("time must be HH:MM, got '{time}'")))
}

fn validate_color(color: &str) -> Result<(), AppError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(AppError::bad_request(format!("color must be #RRGGBB, got '{color}'")))
    }
}

fn validate_length(length: u32) -> Result<(), AppError> {
    if length == 0 {
        return Err(AppError::bad_request("length must be at least one minute"));
    }
    Ok(())
}

fn validate_curve(curve: &IntensityCurve) -> Result<(), AppError> {
    for (label, value) in [
        ("startIntensity", curve.start_intensity),
        ("endIntensity", curve.end_intensity),
    ] {
        if !(0.0..=100.0).contains(&value) {
            return Err(AppError::bad_request(format!("{label} must be within 0-100")));
        }
    }
    if curve
        .hyper_parameter
        .is_some_and(|p| !p.is_finite() || p.abs() > MAX_HYPER_PARAMETER)
    {
        return Err(AppError::bad_request(format!(
            "hyperParameter must be within -{MAX_HYPER_PARAMETER} and {MAX_HYPER_PARAMETER}"
        )));
    }
    let in_range = curve
        .control_points
        .iter()
        .flatten()
        .all(|p| p.x > 0.0 && p.x < 100.0 && (0.0..=100.0).contains(&p.y));
    if !in_range {
        return Err(AppError::bad_request(
            "controlPoints need x strictly within 0-100 and y within 0-100",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_defaults_fill_missing_fields() {
        let draft: AlarmDraft = serde_json::from_str(r#"{"name":"Wake up"}"#).unwrap();
        assert_eq!(draft.time, "08:00");
        assert_eq!(draft.color, DEFAULT_ALARM_COLOR);
        assert_eq!(draft.length, 15);
        assert!(draft.is_active);
        assert_eq!(draft.intensity_curve, IntensityCurve::default());
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn draft_validation_rejects_bad_fields() {
        let cases = [
            AlarmDraft { time: "25:00".into(), ..AlarmDraft::default() },
            AlarmDraft { color: "green".into(), ..AlarmDraft::default() },
            AlarmDraft { length: 0, ..AlarmDraft::default() },
            AlarmDraft {
                intensity_curve: IntensityCurve { end_intensity: 120.0, ..IntensityCurve::default() },
                ..AlarmDraft::default()
            },
            AlarmDraft {
                intensity_curve: IntensityCurve {
                    curve: CurveKind::SCurve,
                    hyper_parameter: Some(900.0),
                    ..IntensityCurve::default()
                },
                ..AlarmDraft::default()
            },
            AlarmDraft {
                intensity_curve: IntensityCurve {
                    curve: CurveKind::Custom,
                    control_points: Some(vec![ControlPoint::new(100.0, 50.0)]),
                    ..IntensityCurve::default()
                },
                ..AlarmDraft::default()
            },
        ];
        for draft in cases {
            let err = draft.validate().unwrap_err();
            assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn update_only_touches_present_fields() {
        let created = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        let later = DateTime::<Utc>::from_timestamp(1_700_000_600, 0).unwrap();
        let mut alarm = AlarmDraft {
            name: "Morning".into(),
            ..AlarmDraft::default()
        }
        .into_alarm(Uuid::new_v4(), created);

        let update: AlarmUpdate = serde_json::from_str(r#"{"isActive":false,"time":"06:30"}"#).unwrap();
        update.validate().unwrap();
        update.apply(&mut alarm, later);

        assert_eq!(alarm.name, "Morning");
        assert_eq!(alarm.time, "06:30");
        assert!(!alarm.is_active);
        assert_eq!(alarm.created_at, created);
        assert_eq!(alarm.updated_at, later);
    }

    #[test]
    fn alarm_serializes_in_camel_case() {
        let now = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        let alarm = AlarmDraft::default().into_alarm(Uuid::nil(), now);
        let json = serde_json::to_value(&alarm).unwrap();
        assert_eq!(json["intensityCurve"]["curve"], "linear");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["recurrence"], serde_json::json!({"type": "daily"}));
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn point_edits_are_tagged_by_op() {
        let edit: PointEdit = serde_json::from_str(r#"{"op":"move","index":1,"x":20,"y":30}"#).unwrap();
        assert!(matches!(edit, PointEdit::Move { index: 1, .. }));
    }
}
