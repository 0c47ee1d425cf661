//! Property values and the checked arithmetic the interpolating actions need.

use serde::{Deserialize, Serialize};

use crate::error::ActionError;

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Float,
    Vec2,
    Vec3,
    ColorRgba,
    Frame,
}

/// A property value. Frames are discrete; every other kind interpolates component-wise.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// Scalar float (rotation, opacity, scale axis)
    Float(f32),
    /// 2D vector (position)
    Vec2([f32; 2]),
    /// 3D vector (custom properties)
    Vec3([f32; 3]),
    /// RGBA color, one channel per component
    ColorRgba([f32; 4]),
    /// Discrete visual frame index
    Frame(i32),
}

#[inline]
fn zip_map<const N: usize>(a: [f32; N], b: [f32; N], f: impl Fn(f32, f32) -> f32) -> [f32; N] {
    std::array::from_fn(|i| f(a[i], b[i]))
}

impl Value {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Float(_) => ValueKind::Float,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::ColorRgba(_) => ValueKind::ColorRgba,
            Value::Frame(_) => ValueKind::Frame,
        }
    }

    fn mismatch(&self, other: &Value) -> ActionError {
        ActionError::ValueKindMismatch {
            expected: self.kind(),
            actual: other.kind(),
        }
    }

    /// Component-wise `self - other`.
    pub fn sub(&self, other: &Value) -> Result<Value, ActionError> {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a - b)),
            (Value::Vec2(a), Value::Vec2(b)) => Ok(Value::Vec2(zip_map(*a, *b, |x, y| x - y))),
            (Value::Vec3(a), Value::Vec3(b)) => Ok(Value::Vec3(zip_map(*a, *b, |x, y| x - y))),
            (Value::ColorRgba(a), Value::ColorRgba(b)) => {
                Ok(Value::ColorRgba(zip_map(*a, *b, |x, y| x - y)))
            }
            (Value::Frame(a), Value::Frame(b)) => Ok(Value::Frame(a.wrapping_sub(*b))),
            _ => Err(self.mismatch(other)),
        }
    }

    /// `self + delta * t`.
    ///
    /// Frames advance by whole steps only: the scaled delta is truncated toward zero, so a
    /// frame never changes before a full step of progress has elapsed in either direction.
    pub fn add_scaled(&self, delta: &Value, t: f32) -> Result<Value, ActionError> {
        match (self, delta) {
            (Value::Float(a), Value::Float(d)) => Ok(Value::Float(a + d * t)),
            (Value::Vec2(a), Value::Vec2(d)) => {
                Ok(Value::Vec2(zip_map(*a, *d, |x, dx| x + dx * t)))
            }
            (Value::Vec3(a), Value::Vec3(d)) => {
                Ok(Value::Vec3(zip_map(*a, *d, |x, dx| x + dx * t)))
            }
            (Value::ColorRgba(a), Value::ColorRgba(d)) => {
                Ok(Value::ColorRgba(zip_map(*a, *d, |x, dx| x + dx * t)))
            }
            (Value::Frame(a), Value::Frame(d)) => {
                let step = (*d as f32 * t).trunc() as i32;
                Ok(Value::Frame(a.wrapping_add(step)))
            }
            _ => Err(self.mismatch(delta)),
        }
    }

    /// Additive inverse, used when reversing By-actions.
    pub fn neg(&self) -> Value {
        match self {
            Value::Float(a) => Value::Float(-a),
            Value::Vec2(a) => Value::Vec2(a.map(|x| -x)),
            Value::Vec3(a) => Value::Vec3(a.map(|x| -x)),
            Value::ColorRgba(a) => Value::ColorRgba(a.map(|x| -x)),
            Value::Frame(a) => Value::Frame(a.wrapping_neg()),
        }
    }

    /// Largest absolute component difference, or `None` if kinds differ.
    pub fn max_abs_diff(&self, other: &Value) -> Option<f32> {
        let diff = self.sub(other).ok()?;
        let m = match diff {
            Value::Float(a) => a.abs(),
            Value::Vec2(a) => a.iter().fold(0.0f32, |m, x| m.max(x.abs())),
            Value::Vec3(a) => a.iter().fold(0.0f32, |m, x| m.max(x.abs())),
            Value::ColorRgba(a) => a.iter().fold(0.0f32, |m, x| m.max(x.abs())),
            Value::Frame(a) => a.unsigned_abs() as f32,
        };
        Some(m)
    }
}
