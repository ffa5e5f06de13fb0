use serde::{Deserialize, Serialize};

/// Control point of a [`PullCurve::Keyframes`] curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    /// Input position, normally in `[0, 1]`.
    pub time: f32,
    /// Output value at `time`.
    pub value: f32,
}

/// Easing applied to the normalized charge progress of a pull.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PullCurve {
    /// Output equals input.
    Linear,
    /// Smoothstep from `(0, 0)` to `(1, 1)`.
    #[default]
    EaseInOut,
    /// Piecewise-linear curve through the provided keys, sorted by time.
    Keyframes {
        /// Control points.
        keys: Vec<CurveKey>,
    },
}

impl PullCurve {
    /// Evaluates the curve at `t`.
    ///
    /// Keyframe curves hold their first and last value outside the keyed range
    /// and evaluate to `t` when no keys are present.
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        match self {
            PullCurve::Linear => t,
            PullCurve::EaseInOut => {
                let x = t.clamp(0.0, 1.0);
                x * x * (3.0 - 2.0 * x)
            }
            PullCurve::Keyframes { keys } => evaluate_keys(keys, t),
        }
    }
}

fn evaluate_keys(keys: &[CurveKey], t: f32) -> f32 {
    let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
        return t;
    };
    if t <= first.time {
        return first.value;
    }
    if t >= last.time {
        return last.value;
    }

    for pair in keys.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        if t <= to.time {
            let span = to.time - from.time;
            if span <= f32::EPSILON {
                return to.value;
            }
            let ratio = (t - from.time) / span;
            return from.value + (to.value - from.value) * ratio;
        }
    }
    last.value
}
