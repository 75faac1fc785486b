// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera keyframe animation for the keyview model viewer.
//!
//! This crate records camera poses as keyframes and plays them back:
//! - Ordered keyframe store with selection and change notifications
//! - Orbit-style interpolation (spherical position, slerped orientation)
//! - Frame-driven camera timeline player
//! - Model clip playback through an [`AnimationMixer`]
//! - JSON import/export of camera animations
//!
//! ## Architecture
//!
//! The host owns the camera and the render loop. It implements
//! [`CameraRig`] for its camera, hands it to a [`PlaybackCoordinator`] and
//! calls [`PlaybackCoordinator::on_frame`] once per rendered frame. UI input
//! arrives as [`PanelAction`]s from the [`KeyframePanel`].

pub mod clock;
pub mod coordinator;
pub mod document;
pub mod interpolation;
pub mod keyframe;
pub mod mixer;
pub mod model_timeline;
pub mod panel;
pub mod player;
pub mod rig;
pub mod session;
pub mod settings;
pub mod store;

pub use clock::{FrameClock, FrameTick};
pub use coordinator::{FrameReport, PlaybackCoordinator};
pub use document::{CameraAnimationDocument, CameraRecord, DocumentError, KeyframeRecord, PointRecord, QuaternionRecord};
pub use interpolation::{InterpolatedPose, Interpolation, Spherical};
pub use keyframe::{CameraKeyframe, KeyframeId, Quat, Vec3, DEFAULT_ANIMATION_SPEED_MS, QUAT_IDENTITY};
pub use mixer::{AnimationMixer, ClipInfo, ClipMixer, LoopMode};
pub use model_timeline::ModelTimeline;
pub use panel::{KeyframePanel, PanelAction, PanelStatus};
pub use player::{CameraTimelinePlayer, PlaybackState, TickOutcome};
pub use rig::{CameraPose, CameraRig, HeadlessRig, ZoomTarget};
pub use session::CameraAnimationSession;
pub use settings::{SettingsError, TimelineSettings, SETTINGS_FILE_NAME};
pub use store::{KeyframeStore, StoreCallback, StoreChange};
