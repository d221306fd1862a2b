//! Callback surface the 3D scene host drives.

use serde::{Deserialize, Serialize};

/// A point in scene space, in meters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct ScenePoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl ScenePoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn offset(&self, dx: f32, dy: f32, dz: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub fn distance(&self, other: &ScenePoint) -> f32 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// A tap location in view coordinates.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PlaneAlignment {
    Horizontal,
    Vertical,
}

/// A detected surface the holdings can be placed on.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaneAnchor {
    pub id: String,
    pub center: ScenePoint,
    pub alignment: PlaneAlignment,
}

/// Events a scene host reports. Hosts hit-test taps themselves and pass the
/// symbol of the bar they hit, if any.
///
/// Implementations may schedule timers and must be called from within a
/// tokio runtime.
pub trait SceneEventListener: Send + Sync {
    fn on_anchor_detected(&self, anchor: &PlaneAnchor);

    fn on_tap(&self, point: ScreenPoint, hit_symbol: Option<&str>);

    /// A tap that missed every bar but hit a surface at `world`.
    fn on_surface_hit(&self, _world: ScenePoint) {}
}
