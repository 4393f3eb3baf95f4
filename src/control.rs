// src/control.rs - pinch distance to volume mapping and display read-back
use tracing::warn;

use crate::audio::AudioEndpoint;

/// Pixel span of a thumb-index pinch, closed hand to open hand.
pub const PINCH_DOMAIN: [f64; 2] = [50.0, 250.0];

/// Vertical pixel span of the overlay bar. Inverted on purpose: 150 is the
/// "full" end, 400 the empty end.
pub const BAR_SPAN: [f64; 2] = [400.0, 150.0];

/// Linear interpolation with clamp-to-range semantics.
///
/// Values outside the input domain clamp to the nearest edge rather than
/// extrapolating, and the output span may be inverted (hi < lo).
pub fn interp(value: f64, domain: [f64; 2], range: [f64; 2]) -> f64 {
    let [d0, d1] = domain;
    let [r0, r1] = range;
    if d1 <= d0 {
        return r0;
    }
    let t = ((value - d0) / (d1 - d0)).clamp(0.0, 1.0);
    r0 + t * (r1 - r0)
}

/// What the volume portion of the overlay should show this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeDisplay {
    /// Current level, with the bar's top edge in overlay pixels.
    Level { percent: i32, bar_y: i32 },
    /// Endpoint missing or unreadable. Rendered distinctly from 0%.
    Unavailable,
}

impl VolumeDisplay {
    pub fn percent(&self) -> Option<i32> {
        match self {
            Self::Level { percent, .. } => Some(*percent),
            Self::Unavailable => None,
        }
    }
}

/// Maps pinch distance onto the endpoint's native volume range and derives
/// the display reading from what the device actually reports back.
pub struct VolumeControl {
    endpoint: Option<Box<dyn AudioEndpoint>>,
    range: (f64, f64),
    pinch_domain: [f64; 2],
}

impl VolumeControl {
    pub fn new(endpoint: Option<Box<dyn AudioEndpoint>>) -> Self {
        Self::with_pinch_domain(endpoint, PINCH_DOMAIN)
    }

    pub fn with_pinch_domain(endpoint: Option<Box<dyn AudioEndpoint>>, pinch_domain: [f64; 2]) -> Self {
        // The range is queried once; devices do not change it mid-session.
        let range = endpoint
            .as_ref()
            .map(|e| e.volume_range())
            .unwrap_or((0.0, 1.0));
        Self {
            endpoint,
            range,
            pinch_domain,
        }
    }

    pub fn has_endpoint(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Drive the endpoint from a pinch distance and return the display
    /// reading.
    ///
    /// A failed set still attempts the read-back; a failed read-back falls
    /// back to a direct read of the current system value; if that fails too
    /// the display is explicitly unavailable. Nothing escapes this method.
    pub fn apply_pinch(&mut self, distance: f64) -> VolumeDisplay {
        let (min, max) = self.range;
        let target = interp(distance, self.pinch_domain, [min, max]);

        let readback = match self.endpoint.as_mut() {
            Some(endpoint) => {
                if let Err(e) = endpoint.set_master_volume(target) {
                    warn!("setting volume failed: {}", e);
                }
                // Read the exact value back; the device may quantize.
                endpoint.master_volume()
            }
            None => return VolumeDisplay::Unavailable,
        };

        match readback {
            Ok(current) => Self::display_for(current, (min, max)),
            Err(e) => {
                warn!("volume read-back failed: {}", e);
                self.read_display()
            }
        }
    }

    /// Display reading from a direct query of the current system volume,
    /// used on frames where no pinch is active.
    pub fn read_display(&self) -> VolumeDisplay {
        let Some(endpoint) = self.endpoint.as_ref() else {
            return VolumeDisplay::Unavailable;
        };
        match endpoint.master_volume() {
            Ok(current) => Self::display_for(current, self.range),
            Err(e) => {
                warn!("reading system volume failed: {}", e);
                VolumeDisplay::Unavailable
            }
        }
    }

    fn display_for(native: f64, (min, max): (f64, f64)) -> VolumeDisplay {
        let percent = interp(native, [min, max], [0.0, 100.0]).round() as i32;
        let bar_y = interp(percent as f64, [0.0, 100.0], BAR_SPAN).round() as i32;
        VolumeDisplay::Level { percent, bar_y }
    }
}
