//! Easing functions for animation timing.
//!
//! Two families are supported:
//! - CSS timing functions: `linear`, `ease`, `ease-in`, `ease-out`,
//!   `ease-in-out`, `cubic-bezier(...)` and `steps(...)`
//! - Penner curves as named by timeline libraries and scroll-reveal
//!   libraries: `easeOutExpo`, `easeInCubic`, `ease-out-cubic`,
//!   `easeInOutSine`, ...
//!
//! # Usage
//!
//! ```
//! use timeless_anim::easing::EasingFunction;
//!
//! let ease: EasingFunction = "easeOutExpo".parse().unwrap();
//! let progress = ease.evaluate(0.5);
//! assert!(progress > 0.9);
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AnimError;

/// Position for stepped animations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPosition {
    /// Jump at the start of each interval (CSS `jump-start` / `start`).
    Start,
    /// Jump at the end of each interval (CSS `jump-end` / `end`).
    #[default]
    End,
}

/// Polynomial / trigonometric family of a Penner curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PennerCurve {
    Quad,
    Cubic,
    Quart,
    Quint,
    Sine,
    Expo,
    Circ,
}

/// Which end of the curve is eased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EaseMode {
    In,
    Out,
    InOut,
}

/// Easing function for animation timing.
///
/// Maps linear progress (0.0 to 1.0) to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,

    /// CSS `ease`, equivalent to `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    #[default]
    Ease,

    /// CSS `ease-in`, equivalent to `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,

    /// CSS `ease-out`, equivalent to `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,

    /// CSS `ease-in-out`, equivalent to `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,

    /// Custom cubic bezier curve; x values must be in [0, 1].
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },

    /// Stepped animation with discrete jumps.
    Steps { count: u32, position: StepPosition },

    /// Named Penner curve (`easeOutExpo` and friends).
    Penner { curve: PennerCurve, mode: EaseMode },
}

impl EasingFunction {
    /// Evaluate the easing function at progress `t` (clamped to 0..=1).
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(*x1, *y1, *x2, *y2, t),
            Self::Steps { count, position } => stepped(*count, *position, t),
            Self::Penner { curve, mode } => penner(*curve, *mode, t),
        }
    }

    pub const fn penner(curve: PennerCurve, mode: EaseMode) -> Self {
        Self::Penner { curve, mode }
    }

    /// CSS `transition-timing-function` value. Penner curves map to their
    /// usual cubic-bezier approximations.
    pub fn to_css(&self) -> String {
        match self {
            Self::Linear => "linear".to_string(),
            Self::Ease => "ease".to_string(),
            Self::EaseIn => "ease-in".to_string(),
            Self::EaseOut => "ease-out".to_string(),
            Self::EaseInOut => "ease-in-out".to_string(),
            Self::CubicBezier { x1, y1, x2, y2 } => {
                format!("cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
            Self::Steps { count, position } => {
                let position = match position {
                    StepPosition::Start => "start",
                    StepPosition::End => "end",
                };
                format!("steps({count}, {position})")
            }
            Self::Penner { curve, mode } => {
                let [x1, y1, x2, y2] = penner_bezier(*curve, *mode);
                format!("cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
        }
    }
}

fn penner_bezier(curve: PennerCurve, mode: EaseMode) -> [f32; 4] {
    use EaseMode::*;
    use PennerCurve::*;
    match (curve, mode) {
        (Quad, In) => [0.55, 0.085, 0.68, 0.53],
        (Quad, Out) => [0.25, 0.46, 0.45, 0.94],
        (Quad, InOut) => [0.455, 0.03, 0.515, 0.955],
        (Cubic, In) => [0.55, 0.055, 0.675, 0.19],
        (Cubic, Out) => [0.215, 0.61, 0.355, 1.0],
        (Cubic, InOut) => [0.645, 0.045, 0.355, 1.0],
        (Quart, In) => [0.895, 0.03, 0.685, 0.22],
        (Quart, Out) => [0.165, 0.84, 0.44, 1.0],
        (Quart, InOut) => [0.77, 0.0, 0.175, 1.0],
        (Quint, In) => [0.755, 0.05, 0.855, 0.06],
        (Quint, Out) => [0.23, 1.0, 0.32, 1.0],
        (Quint, InOut) => [0.86, 0.0, 0.07, 1.0],
        (Sine, In) => [0.47, 0.0, 0.745, 0.715],
        (Sine, Out) => [0.39, 0.575, 0.565, 1.0],
        (Sine, InOut) => [0.445, 0.05, 0.55, 0.95],
        (Expo, In) => [0.95, 0.05, 0.795, 0.035],
        (Expo, Out) => [0.19, 1.0, 0.22, 1.0],
        (Expo, InOut) => [1.0, 0.0, 0.0, 1.0],
        (Circ, In) => [0.6, 0.04, 0.98, 0.335],
        (Circ, Out) => [0.075, 0.82, 0.165, 1.0],
        (Circ, InOut) => [0.785, 0.135, 0.15, 0.86],
    }
}

impl FromStr for EasingFunction {
    type Err = AnimError;

    /// Accepts CSS keywords, `cubic-bezier(a, b, c, d)`, `steps(n[, start|end])`,
    /// camel-case Penner names (`easeInOutSine`) and dashed ones (`ease-out-cubic`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let unknown = || AnimError::UnknownEasing(raw.to_string());

        if let Some(args) = function_args(raw, "cubic-bezier") {
            let values: Vec<f32> = args
                .split(',')
                .map(|v| v.trim().parse::<f32>())
                .collect::<Result<_, _>>()
                .map_err(|_| unknown())?;
            return match values.as_slice() {
                [x1, y1, x2, y2] if (0.0..=1.0).contains(x1) && (0.0..=1.0).contains(x2) => {
                    Ok(Self::CubicBezier {
                        x1: *x1,
                        y1: *y1,
                        x2: *x2,
                        y2: *y2,
                    })
                }
                _ => Err(unknown()),
            };
        }
        if let Some(args) = function_args(raw, "steps") {
            let mut parts = args.split(',').map(str::trim);
            let count = parts
                .next()
                .and_then(|c| c.parse::<u32>().ok())
                .filter(|c| *c >= 1)
                .ok_or_else(unknown)?;
            let position = match parts.next() {
                None | Some("end" | "jump-end") => StepPosition::End,
                Some("start" | "jump-start") => StepPosition::Start,
                Some(_) => return Err(unknown()),
            };
            return Ok(Self::Steps { count, position });
        }

        let key: String = raw
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        let simple = match key.as_str() {
            "linear" => Some(Self::Linear),
            "ease" => Some(Self::Ease),
            "easein" => Some(Self::EaseIn),
            "easeout" => Some(Self::EaseOut),
            "easeinout" => Some(Self::EaseInOut),
            _ => None,
        };
        if let Some(easing) = simple {
            return Ok(easing);
        }

        let (mode, curve) = if let Some(rest) = key.strip_prefix("easeinout") {
            (EaseMode::InOut, rest)
        } else if let Some(rest) = key.strip_prefix("easein") {
            (EaseMode::In, rest)
        } else if let Some(rest) = key.strip_prefix("easeout") {
            (EaseMode::Out, rest)
        } else {
            return Err(unknown());
        };
        let curve = match curve {
            "quad" => PennerCurve::Quad,
            "cubic" => PennerCurve::Cubic,
            "quart" => PennerCurve::Quart,
            "quint" => PennerCurve::Quint,
            "sine" => PennerCurve::Sine,
            "expo" => PennerCurve::Expo,
            "circ" => PennerCurve::Circ,
            _ => return Err(unknown()),
        };
        Ok(Self::Penner { curve, mode })
    }
}

fn function_args<'a>(raw: &'a str, name: &str) -> Option<&'a str> {
    raw.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn penner(curve: PennerCurve, mode: EaseMode, t: f32) -> f32 {
    match mode {
        EaseMode::In => penner_in(curve, t),
        EaseMode::Out => 1.0 - penner_in(curve, 1.0 - t),
        EaseMode::InOut => {
            if t < 0.5 {
                penner_in(curve, t * 2.0) / 2.0
            } else {
                1.0 - penner_in(curve, -2.0 * t + 2.0) / 2.0
            }
        }
    }
}

fn penner_in(curve: PennerCurve, t: f32) -> f32 {
    match curve {
        PennerCurve::Quad => t.powi(2),
        PennerCurve::Cubic => t.powi(3),
        PennerCurve::Quart => t.powi(4),
        PennerCurve::Quint => t.powi(5),
        PennerCurve::Sine => 1.0 - (t * std::f32::consts::FRAC_PI_2).cos(),
        PennerCurve::Expo => {
            if t <= 0.0 {
                0.0
            } else {
                2f32.powf(10.0 * t - 10.0)
            }
        }
        PennerCurve::Circ => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
    }
}

/// Evaluate a cubic bezier curve at progress `progress`.
///
/// Newton-Raphson finds the curve parameter whose x equals the progress,
/// then the y coordinate at that parameter is returned.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, progress: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let t = solve_bezier_x(x1, x2, progress);
    bezier_y(y1, y2, t)
}

fn solve_bezier_x(x1: f32, x2: f32, target_x: f32) -> f32 {
    let mut t = target_x;

    for _ in 0..8 {
        let x = bezier_x(x1, x2, t) - target_x;
        if x.abs() < 1e-6 {
            break;
        }

        let dx = bezier_x_derivative(x1, x2, t);
        if dx.abs() < 1e-6 {
            break;
        }

        t -= x / dx;
        t = t.clamp(0.0, 1.0);
    }

    t
}

/// x(t) = 3(1-t)²t·x1 + 3(1-t)t²·x2 + t³
#[inline]
fn bezier_x(x1: f32, x2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * x1 + 3.0 * mt * t * t * x2 + t * t * t
}

#[inline]
fn bezier_y(y1: f32, y2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * y1 + 3.0 * mt * t * t * y2 + t * t * t
}

/// dx/dt = 3(1-t)²·x1 + 6(1-t)t·(x2-x1) + 3t²·(1-x2)
#[inline]
fn bezier_x_derivative(x1: f32, x2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * x1 + 6.0 * mt * t * (x2 - x1) + 3.0 * t * t * (1.0 - x2)
}

fn stepped(steps: u32, position: StepPosition, t: f32) -> f32 {
    if steps == 0 {
        return t;
    }
    let steps_f = steps as f32;
    match position {
        StepPosition::Start => (t * steps_f).ceil() / steps_f,
        StepPosition::End => (t * steps_f).floor() / steps_f,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_boundaries_for_every_named_curve() {
        for name in [
            "linear",
            "ease",
            "ease-in-out",
            "easeOutExpo",
            "easeInCubic",
            "easeOutCubic",
            "ease-out-cubic",
            "easeInOutSine",
            "easeInOutQuad",
            "easeOutCirc",
        ] {
            let ease: EasingFunction = name.parse().unwrap();
            assert!(approx_eq(ease.evaluate(0.0), 0.0), "{name} at 0");
            assert!(approx_eq(ease.evaluate(1.0), 1.0), "{name} at 1");
        }
    }

    #[test]
    fn test_dashed_and_camel_names_agree() {
        let dashed: EasingFunction = "ease-out-cubic".parse().unwrap();
        let camel: EasingFunction = "easeOutCubic".parse().unwrap();
        assert_eq!(dashed, camel);
        assert_eq!(
            camel,
            EasingFunction::penner(PennerCurve::Cubic, EaseMode::Out)
        );
    }

    #[test]
    fn test_out_curves_front_load_progress() {
        let expo: EasingFunction = "easeOutExpo".parse().unwrap();
        let cubic_in: EasingFunction = "easeInCubic".parse().unwrap();
        assert!(expo.evaluate(0.25) > 0.8);
        assert!(approx_eq(cubic_in.evaluate(0.5), 0.125));
    }

    #[test]
    fn test_in_out_sine_is_symmetric() {
        let ease: EasingFunction = "easeInOutSine".parse().unwrap();
        assert!(approx_eq(ease.evaluate(0.5), 0.5));
        let a = ease.evaluate(0.2);
        let b = ease.evaluate(0.8);
        assert!(approx_eq(a + b, 1.0));
    }

    #[test]
    fn test_css_ease_midpoint() {
        let mid = EasingFunction::Ease.evaluate(0.5);
        assert!(mid > 0.7 && mid < 0.9, "CSS ease mid-point should be ~0.8, got {}", mid);
    }

    #[test]
    fn test_cubic_bezier_and_steps_parse() {
        let bezier: EasingFunction = "cubic-bezier(0.4, 0, 0.2, 1)".parse().unwrap();
        assert!(matches!(bezier, EasingFunction::CubicBezier { .. }));
        let steps: EasingFunction = "steps(4, start)".parse().unwrap();
        assert!(approx_eq(steps.evaluate(0.1), 0.25));
        assert!("cubic-bezier(1.5, 0, 0.2, 1)".parse::<EasingFunction>().is_err());
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert_eq!(
            "easeOutWobble".parse::<EasingFunction>(),
            Err(AnimError::UnknownEasing("easeOutWobble".to_string()))
        );
        assert!("spring".parse::<EasingFunction>().is_err());
    }

    #[test]
    fn test_clamping() {
        let ease = EasingFunction::Linear;
        assert!(approx_eq(ease.evaluate(-0.5), 0.0));
        assert!(approx_eq(ease.evaluate(1.5), 1.0));
    }

    #[test]
    fn css_values() {
        let keyword: EasingFunction = "ease-in-out".parse().unwrap();
        assert_eq!(keyword.to_css(), "ease-in-out");
        let cubic: EasingFunction = "ease-out-cubic".parse().unwrap();
        assert_eq!(cubic.to_css(), "cubic-bezier(0.215, 0.61, 0.355, 1)");
        let steps: EasingFunction = "steps(4, start)".parse().unwrap();
        assert_eq!(steps.to_css(), "steps(4, start)");
    }
}
