//! # gesture_intent
//!
//! Hand-gesture intent recognition: turns noisy per-frame hand-landmark
//! positions into a debounced discrete intent stream, plus a continuous
//! volume control driven by thumb-index pinch distance.
//!
//! ## Gesture → Intent mapping
//!
//! | Hand pose | Intent |
//! |---|---|
//! | All fingers flexed (fist) | `WAIT` |
//! | All fingers extended, hand low | `STOP` |
//! | All fingers extended, wrist in the top quarter of the frame | `HELP` |
//! | Index + middle extended | `PEACE` |
//! | Index + pinky extended, middle + ring flexed | `ROCK ON` |
//! | Thumb + index extended, middle flexed | `VOLUME CTRL` |
//! | No rule match / no hand in view | `Listening...` |
//!
//! `VOLUME CTRL` additionally maps the thumb-tip/index-tip pixel distance
//! (50 px closed … 250 px open) onto the audio endpoint's native volume
//! range, reading the value back for display.
//!
//! Raw per-frame classifications flicker, so a committed intent only changes
//! after three consecutive identical detections; see [`stabilizer`].
//!
//! Video capture, the landmark-detection model, and the OS audio backend are
//! external collaborators behind the [`detector::LandmarkSource`] and
//! [`audio::AudioEndpoint`] traits. Simulated implementations of both ship
//! with the crate, so the demo binary and tests run with no hardware.

pub mod audio;
pub mod classifier;
pub mod control;
pub mod detector;
pub mod engine;
pub mod fingers;
pub mod landmarks;
pub mod overlay;
pub mod session;
pub mod stabilizer;

pub use classifier::Intent;
pub use engine::{EngineConfig, FrameOutput, GestureEngine, StatusSnapshot};
pub use landmarks::{EngineError, FrameSize, LandmarkSet};
