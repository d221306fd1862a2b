//! Data and callbacks for the 3D holdings scene.
//!
//! The scene host renders [`BarLayout`]s and reports anchors and taps through
//! [`SceneEventListener`]; selection changes flow back out as
//! `SelectionChanged` events.

pub mod scene_model;
pub mod scene_presenter;
pub mod scene_traits;
pub mod selection;

pub use scene_model::{layout_bars, nearest_bar, BarLayout, PerformanceTone};
pub use scene_presenter::{ScenePlacement, ScenePresenter};
pub use scene_traits::{PlaneAlignment, PlaneAnchor, SceneEventListener, ScenePoint, ScreenPoint};
pub use selection::{SelectionController, SelectionState};
