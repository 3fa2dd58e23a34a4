//! Intensity curves.
//!
//! A curve maps normalized elapsed alarm time in `[0, 1]` to an intensity on the
//! `0..=100` scale. The closed-form kinds are evaluated directly; the custom kind
//! is a Catmull-Rom spline through the start point, the user's control points and
//! the end point.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SHARPNESS: f64 = 10.0;
pub const DEFAULT_DECAY: f64 = 10.0;
/// Decay used when an asymptotic curve arrives without a hyper-parameter.
pub const FALLBACK_DECAY: f64 = 4.0;
pub const DEFAULT_SPLINE_SAMPLES: usize = 11;
/// Largest accepted magnitude for sharpness and decay.
pub const MAX_HYPER_PARAMETER: f64 = 50.0;

const ASYMPTOTIC_RATE: f64 = 0.4;
const DEGENERATE_EPSILON: f64 = 1e-12;

pub fn default_custom_points() -> Vec<ControlPoint> {
    vec![ControlPoint::new(25.0, 40.0), ControlPoint::new(75.0, 50.0)]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CurveKind {
    #[default]
    Linear,
    Quadratic,
    Asymptotic,
    SCurve,
    Custom,
}

impl CurveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CurveKind::Linear => "linear",
            CurveKind::Quadratic => "quadratic",
            CurveKind::Asymptotic => "asymptotic",
            CurveKind::SCurve => "s-curve",
            CurveKind::Custom => "custom",
        }
    }

    /// Parses a wire name. Unknown names fall back to linear.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "quadratic" | "exponential" => CurveKind::Quadratic,
            "asymptotic" => CurveKind::Asymptotic,
            "s-curve" => CurveKind::SCurve,
            "custom" => CurveKind::Custom,
            _ => CurveKind::Linear,
        }
    }

    pub fn default_hyper_parameter(self) -> Option<f64> {
        match self {
            CurveKind::SCurve => Some(DEFAULT_SHARPNESS),
            CurveKind::Asymptotic => Some(DEFAULT_DECAY),
            _ => None,
        }
    }
}

impl From<String> for CurveKind {
    fn from(value: String) -> Self {
        CurveKind::parse(&value)
    }
}

impl From<CurveKind> for String {
    fn from(kind: CurveKind) -> Self {
        kind.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
}

impl ControlPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &ControlPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntensityCurve {
    pub start_intensity: f64,
    pub end_intensity: f64,
    pub curve: CurveKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyper_parameter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_points: Option<Vec<ControlPoint>>,
}

impl Default for IntensityCurve {
    fn default() -> Self {
        Self {
            start_intensity: 0.0,
            end_intensity: 100.0,
            curve: CurveKind::Linear,
            hyper_parameter: None,
            control_points: None,
        }
    }
}

impl IntensityCurve {
    /// Returns a copy switched to `kind`, with the kind-specific settings reset.
    pub fn with_kind(&self, kind: CurveKind) -> Self {
        Self {
            start_intensity: self.start_intensity,
            end_intensity: self.end_intensity,
            curve: kind,
            hyper_parameter: kind.default_hyper_parameter(),
            control_points: (kind == CurveKind::Custom).then(default_custom_points),
        }
    }

    /// Puts the control points in ascending x order.
    pub fn sort_control_points(&mut self) {
        if let Some(points) = self.control_points.as_mut() {
            points.sort_by(|a, b| a.x.total_cmp(&b.x));
        }
    }

    /// Control points sorted by x. The stored order is trusted to be sorted but
    /// a stable sort here keeps evaluation correct for hand-written payloads.
    pub fn sorted_control_points(&self) -> Vec<ControlPoint> {
        let mut points = self.control_points.clone().unwrap_or_default();
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        points
    }

    /// Intensity at normalized time `t`. `t` is clamped to `[0, 1]`.
    pub fn value_at(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if t == 0.0 {
            return self.start_intensity;
        }
        if t == 1.0 {
            return self.end_intensity;
        }

        let factor = match self.curve {
            CurveKind::Linear => t,
            CurveKind::Quadratic => t * t,
            CurveKind::SCurve => s_curve_factor(t, self.hyper_parameter.unwrap_or(DEFAULT_SHARPNESS)),
            CurveKind::Asymptotic => {
                asymptotic_factor(t, self.hyper_parameter.unwrap_or(FALLBACK_DECAY))
            }
            CurveKind::Custom => return self.spline_value_at(t * 100.0),
        };

        self.start_intensity + (self.end_intensity - self.start_intensity) * factor
    }

    /// Evenly spaced samples on the 0..=100 time axis.
    ///
    /// Closed-form kinds yield `steps + 1` points. The custom kind yields its
    /// spline path with `spline_samples` points per segment instead.
    pub fn samples(&self, steps: usize, spline_samples: usize) -> Samples<'_> {
        match self.curve {
            CurveKind::Custom => Samples::Spline(self.spline_path(spline_samples)),
            _ => Samples::Uniform {
                curve: self,
                steps: steps.max(1),
                next: 0,
            },
        }
    }

    /// Catmull-Rom path through `(0, start)`, the control points and `(100, end)`.
    pub fn spline_path(&self, samples_per_segment: usize) -> SplinePath {
        SplinePath::new(self.anchors(), samples_per_segment)
    }

    fn anchors(&self) -> Vec<ControlPoint> {
        let mut anchors = Vec::with_capacity(self.control_points.as_ref().map_or(0, Vec::len) + 2);
        anchors.push(ControlPoint::new(0.0, self.start_intensity));
        anchors.extend(self.sorted_control_points());
        anchors.push(ControlPoint::new(100.0, self.end_intensity));
        anchors
    }

    fn spline_value_at(&self, x: f64) -> f64 {
        let anchors = self.anchors();
        if anchors.len() == 2 {
            return self.start_intensity + (self.end_intensity - self.start_intensity) * x / 100.0;
        }

        for i in 0..anchors.len() - 1 {
            let p1 = anchors[i];
            let p2 = anchors[i + 1];
            if x < p1.x || x > p2.x {
                continue;
            }
            let width = p2.x - p1.x;
            if width.abs() < DEGENERATE_EPSILON {
                return p1.y;
            }
            let p0 = anchors[i.saturating_sub(1)];
            let p3 = anchors[(i + 2).min(anchors.len() - 1)];
            let t = (x - p1.x) / width;
            return catmull_rom(p0.y, p1.y, p2.y, p3.y, t);
        }

        self.end_intensity
    }
}

// For positive sharpness the numerator and denominator are scaled by e^(-p·t)
// and e^(-p/2) so no exponent is positive; negative sharpness keeps the plain form.
fn s_curve_factor(t: f64, sharpness: f64) -> f64 {
    if sharpness == 0.0 {
        return t;
    }
    let (numerator, denominator) = if sharpness > 0.0 {
        (
            -(-sharpness * t).exp_m1(),
            -(-0.5 * sharpness).exp_m1() * (1.0 + (sharpness * (0.5 - t)).exp()),
        )
    } else {
        (
            (sharpness * t).exp_m1(),
            (0.5 * sharpness).exp_m1() * (1.0 + (sharpness * (t - 0.5)).exp()),
        )
    };
    guarded_ratio(numerator, denominator, t)
}

// Same idea for negative decay: multiplying through by e^(rate) keeps every
// exponent non-positive.
fn asymptotic_factor(t: f64, decay: f64) -> f64 {
    let rate = decay * ASYMPTOTIC_RATE;
    if rate == 0.0 {
        return t;
    }
    let (numerator, denominator) = if rate > 0.0 {
        (-(-t * rate).exp_m1(), -(-rate).exp_m1())
    } else {
        ((rate * (1.0 - t)).exp() - rate.exp(), -rate.exp_m1())
    };
    guarded_ratio(numerator, denominator, t)
}

// An infinite denominator is the limit of a very sharp ramp and yields 0.
fn guarded_ratio(numerator: f64, denominator: f64, t: f64) -> f64 {
    if denominator.is_nan() || denominator.abs() < DEGENERATE_EPSILON {
        return t;
    }
    let factor = numerator / denominator;
    if factor.is_finite() { factor } else { t }
}

fn catmull_rom(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    if t == 0.0 {
        return p1;
    }
    if t == 1.0 {
        return p2;
    }
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Lazy sample sequence returned by [`IntensityCurve::samples`].
#[derive(Debug, Clone)]
pub enum Samples<'a> {
    Uniform {
        curve: &'a IntensityCurve,
        steps: usize,
        next: usize,
    },
    Spline(SplinePath),
}

impl Iterator for Samples<'_> {
    type Item = ControlPoint;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Samples::Uniform { curve, steps, next } => {
                if *next > *steps {
                    return None;
                }
                let t = *next as f64 / *steps as f64;
                *next += 1;
                Some(ControlPoint::new(t * 100.0, curve.value_at(t)))
            }
            Samples::Spline(path) => path.next(),
        }
    }
}

/// Finite, restartable walk over a Catmull-Rom spline.
///
/// Each segment contributes `samples_per_segment` points including both of its
/// ends, so neighbouring segments share a point at their joint.
#[derive(Debug, Clone)]
pub struct SplinePath {
    anchors: Vec<ControlPoint>,
    samples_per_segment: usize,
    segment: usize,
    step: usize,
}

impl SplinePath {
    pub fn new(anchors: Vec<ControlPoint>, samples_per_segment: usize) -> Self {
        Self {
            anchors,
            samples_per_segment: samples_per_segment.max(2),
            segment: 0,
            step: 0,
        }
    }

    pub fn segment_count(&self) -> usize {
        self.anchors.len().saturating_sub(1)
    }
}

impl Iterator for SplinePath {
    type Item = ControlPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.segment >= self.segment_count() {
            return None;
        }

        let i = self.segment;
        let p1 = self.anchors[i];
        let p2 = self.anchors[i + 1];
        let p0 = if i == 0 { p1 } else { self.anchors[i - 1] };
        let p3 = self.anchors.get(i + 2).copied().unwrap_or(p2);

        let t = self.step as f64 / (self.samples_per_segment - 1) as f64;
        let point = ControlPoint::new(
            catmull_rom(p0.x, p1.x, p2.x, p3.x, t),
            catmull_rom(p0.y, p1.y, p2.y, p3.y, t),
        );

        self.step += 1;
        if self.step == self.samples_per_segment {
            self.step = 0;
            self.segment += 1;
        }

        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .segment_count()
            .saturating_sub(self.segment)
            .saturating_mul(self.samples_per_segment)
            .saturating_sub(self.step);
        (remaining, Some(remaining))
    }
}

/// SVG path command for a sample sequence drawn into a `width` x `height` box.
pub fn svg_path(points: impl IntoIterator<Item = ControlPoint>, width: f64, height: f64) -> String {
    points
        .into_iter()
        .enumerate()
        .map(|(i, point)| {
            let x = point.x / 100.0 * width;
            let y = height - point.y / 100.0 * height;
            format!("{} {x:.2} {y:.2}", if i == 0 { 'M' } else { 'L' })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn curve(kind: CurveKind, start: f64, end: f64, hyper: Option<f64>) -> IntensityCurve {
        IntensityCurve {
            start_intensity: start,
            end_intensity: end,
            curve: kind,
            hyper_parameter: hyper,
            control_points: None,
        }
    }

    #[test]
    fn closed_form_curves_hit_endpoints_exactly() {
        for kind in [
            CurveKind::Linear,
            CurveKind::Quadratic,
            CurveKind::SCurve,
            CurveKind::Asymptotic,
        ] {
            for (start, end) in [(0.0, 100.0), (80.0, 15.0), (42.0, 42.0)] {
                for hyper in [None, Some(1.0), Some(25.0), Some(-30.0)] {
                    let c = curve(kind, start, end, hyper);
                    assert_eq!(c.value_at(0.0), start, "{kind:?} start");
                    assert_eq!(c.value_at(1.0), end, "{kind:?} end");
                }
            }
        }
    }

    #[test]
    fn linear_midpoint() {
        let c = curve(CurveKind::Linear, 0.0, 100.0, None);
        assert!((c.value_at(0.5) - 50.0).abs() < EPSILON);
    }

    #[test]
    fn quadratic_is_back_loaded() {
        let c = curve(CurveKind::Quadratic, 0.0, 100.0, None);
        assert!((c.value_at(0.5) - 25.0).abs() < EPSILON);
    }

    #[test]
    fn asymptotic_is_front_loaded() {
        let c = curve(CurveKind::Asymptotic, 0.0, 100.0, Some(10.0));
        assert_eq!(c.value_at(0.0), 0.0);
        assert_eq!(c.value_at(1.0), 100.0);
        assert!(c.value_at(0.5) > 50.0);
    }

    #[test]
    fn s_curve_is_symmetric_around_midpoint() {
        let c = curve(CurveKind::SCurve, 0.0, 100.0, Some(10.0));
        assert!(c.value_at(0.25) < 25.0);
        assert!(c.value_at(0.75) > 75.0);
    }

    #[test]
    fn zero_hyper_parameter_falls_back_to_linear() {
        for kind in [CurveKind::SCurve, CurveKind::Asymptotic] {
            let c = curve(kind, 10.0, 90.0, Some(0.0));
            assert!((c.value_at(0.25) - 30.0).abs() < EPSILON, "{kind:?}");
        }
    }

    #[test]
    fn tiny_s_curve_sharpness_approaches_linear() {
        let c = curve(CurveKind::SCurve, 0.0, 100.0, Some(1e-4));
        assert!((c.value_at(0.3) - 30.0).abs() < 0.1);
    }

    #[test]
    fn unset_asymptotic_decay_uses_fallback() {
        let unset = curve(CurveKind::Asymptotic, 0.0, 100.0, None);
        let explicit = curve(CurveKind::Asymptotic, 0.0, 100.0, Some(FALLBACK_DECAY));
        assert_eq!(unset.value_at(0.4), explicit.value_at(0.4));
    }

    #[test]
    fn shaped_curves_are_monotonic_for_positive_parameters() {
        for kind in [CurveKind::SCurve, CurveKind::Asymptotic] {
            for p in [0.5, 4.0, 10.0, 30.0, 50.0] {
                for (start, end) in [(0.0, 100.0), (100.0, 0.0), (20.0, 70.0)] {
                    let c = curve(kind, start, end, Some(p));
                    let values: Vec<f64> = c.samples(200, DEFAULT_SPLINE_SAMPLES).map(|pt| pt.y).collect();
                    for pair in values.windows(2) {
                        if end >= start {
                            assert!(pair[1] >= pair[0] - EPSILON, "{kind:?} p={p} rising");
                        } else {
                            assert!(pair[1] <= pair[0] + EPSILON, "{kind:?} p={p} falling");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn extreme_parameters_stay_monotonic_and_bounded() {
        for kind in [CurveKind::SCurve, CurveKind::Asymptotic] {
            for p in [800.0, 5_000.0, -800.0, -5_000.0] {
                let c = curve(kind, 0.0, 100.0, Some(p));
                let values: Vec<f64> = c.samples(400, DEFAULT_SPLINE_SAMPLES).map(|pt| pt.y).collect();
                for pair in values.windows(2) {
                    assert!(pair[1] >= pair[0] - EPSILON, "{kind:?} p={p}: {} then {}", pair[0], pair[1]);
                }
                for value in values {
                    assert!(value.is_finite() && (-EPSILON..=100.0 + EPSILON).contains(&value));
                }
            }
        }
    }

    #[test]
    fn sort_control_points_orders_by_x() {
        let mut c = curve(CurveKind::Custom, 0.0, 100.0, None);
        c.control_points = Some(vec![ControlPoint::new(70.0, 10.0), ControlPoint::new(30.0, 90.0)]);
        c.sort_control_points();
        assert_eq!(
            c.control_points,
            Some(vec![ControlPoint::new(30.0, 90.0), ControlPoint::new(70.0, 10.0)])
        );
    }

    #[test]
    fn unknown_kind_parses_as_linear() {
        let c: IntensityCurve = serde_json::from_str(
            r#"{"startIntensity":0,"endIntensity":100,"curve":"sawtooth"}"#,
        )
        .unwrap();
        assert_eq!(c.curve, CurveKind::Linear);
        assert!((c.value_at(0.5) - 50.0).abs() < EPSILON);
    }

    #[test]
    fn exponential_is_an_alias_for_quadratic() {
        assert_eq!(CurveKind::parse("exponential"), CurveKind::Quadratic);
    }

    #[test]
    fn serialization_omits_absent_fields() {
        let json = serde_json::to_value(IntensityCurve::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"startIntensity": 0.0, "endIntensity": 100.0, "curve": "linear"})
        );

        let custom = IntensityCurve::default().with_kind(CurveKind::SCurve);
        let json = serde_json::to_value(&custom).unwrap();
        assert_eq!(json["curve"], "s-curve");
        assert_eq!(json["hyperParameter"], 10.0);
        assert!(json.get("controlPoints").is_none());
    }

    #[test]
    fn switching_kind_resets_settings() {
        let c = IntensityCurve::default().with_kind(CurveKind::Custom);
        assert_eq!(c.control_points, Some(default_custom_points()));
        assert_eq!(c.hyper_parameter, None);

        let c = c.with_kind(CurveKind::Asymptotic);
        assert_eq!(c.hyper_parameter, Some(DEFAULT_DECAY));
        assert_eq!(c.control_points, None);
        assert_eq!(c.start_intensity, 0.0);
        assert_eq!(c.end_intensity, 100.0);
    }

    #[test]
    fn custom_curve_hits_endpoints_regardless_of_points() {
        let mut c = curve(CurveKind::Custom, 12.0, 87.0, None);
        for points in [
            vec![],
            vec![ControlPoint::new(50.0, 99.0)],
            vec![ControlPoint::new(10.0, 0.0), ControlPoint::new(90.0, 100.0)],
        ] {
            c.control_points = Some(points);
            assert_eq!(c.value_at(0.0), 12.0);
            assert_eq!(c.value_at(1.0), 87.0);

            let path: Vec<ControlPoint> = c.spline_path(DEFAULT_SPLINE_SAMPLES).collect();
            assert_eq!(path.first(), Some(&ControlPoint::new(0.0, 12.0)));
            assert_eq!(path.last(), Some(&ControlPoint::new(100.0, 87.0)));
        }
    }

    #[test]
    fn custom_curve_passes_through_control_points() {
        let mut c = curve(CurveKind::Custom, 0.0, 100.0, None);
        c.control_points = Some(vec![ControlPoint::new(50.0, 80.0)]);
        assert!((c.value_at(0.5) - 80.0).abs() < EPSILON);
    }

    #[test]
    fn spline_path_has_samples_per_segment() {
        let mut c = curve(CurveKind::Custom, 0.0, 100.0, None);
        c.control_points = Some(default_custom_points());
        let path = c.spline_path(11);
        assert_eq!(path.segment_count(), 3);
        assert_eq!(path.size_hint(), (33, Some(33)));
        assert_eq!(path.count(), 33);
    }

    #[test]
    fn spline_path_is_restartable() {
        let mut c = curve(CurveKind::Custom, 5.0, 95.0, None);
        c.control_points = Some(default_custom_points());
        let path = c.spline_path(DEFAULT_SPLINE_SAMPLES);
        let first: Vec<_> = path.clone().collect();
        let second: Vec<_> = path.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let c = curve(CurveKind::SCurve, 3.0, 97.0, Some(17.0));
        let first: Vec<_> = c.samples(50, DEFAULT_SPLINE_SAMPLES).collect();
        let second: Vec<_> = c.samples(50, DEFAULT_SPLINE_SAMPLES).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn uniform_samples_cover_time_axis() {
        let c = curve(CurveKind::Linear, 0.0, 100.0, None);
        let points: Vec<_> = c.samples(10, DEFAULT_SPLINE_SAMPLES).collect();
        assert_eq!(points.len(), 11);
        assert_eq!(points[0].x, 0.0);
        assert_eq!(points[10].x, 100.0);
    }

    #[test]
    fn svg_path_inverts_y_axis() {
        let path = svg_path(
            [ControlPoint::new(0.0, 0.0), ControlPoint::new(100.0, 100.0)],
            200.0,
            100.0,
        );
        assert_eq!(path, "M 0.00 100.00 L 200.00 0.00");
    }
}
