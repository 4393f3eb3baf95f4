// src/audio.rs - audio endpoint collaborator interface
use anyhow::Result;

/// Native volume endpoint, typically an OS mixer.
///
/// The engine treats every call as fallible and synchronous; a failure is
/// degraded into an "unavailable" display upstream, never propagated. The
/// collaborator may be entirely absent (`Option<Box<dyn AudioEndpoint>>`).
pub trait AudioEndpoint: Send {
    /// Device-defined (min, max) of the native volume scale.
    fn volume_range(&self) -> (f64, f64);

    /// Current native volume level.
    fn master_volume(&self) -> Result<f64>;

    /// Set the native volume level; out-of-range values are clamped by the
    /// device.
    fn set_master_volume(&mut self, level: f64) -> Result<()>;
}

/// In-memory endpoint for demos and tests.
///
/// Defaults to the dB-style range common on desktop mixers,
/// (-65.25, 0.0), starting at the midpoint.
pub struct SimAudioEndpoint {
    level: f64,
    range: (f64, f64),
}

impl SimAudioEndpoint {
    pub fn new() -> Self {
        Self::with_range((-65.25, 0.0))
    }

    pub fn with_range(range: (f64, f64)) -> Self {
        Self {
            level: (range.0 + range.1) / 2.0,
            range,
        }
    }

    pub fn level(&self) -> f64 {
        self.level
    }
}

impl Default for SimAudioEndpoint {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEndpoint for SimAudioEndpoint {
    fn volume_range(&self) -> (f64, f64) {
        self.range
    }

    fn master_volume(&self) -> Result<f64> {
        Ok(self.level)
    }

    fn set_master_volume(&mut self, level: f64) -> Result<()> {
        let (min, max) = self.range;
        self.level = level.clamp(min, max);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_endpoint_clamps_to_its_range() {
        let mut endpoint = SimAudioEndpoint::new();
        endpoint.set_master_volume(10.0).unwrap();
        assert_eq!(endpoint.master_volume().unwrap(), 0.0);
        endpoint.set_master_volume(-100.0).unwrap();
        assert_eq!(endpoint.master_volume().unwrap(), -65.25);
    }

    #[test]
    fn sim_endpoint_starts_at_midpoint() {
        let endpoint = SimAudioEndpoint::with_range((0.0, 100.0));
        assert_eq!(endpoint.master_volume().unwrap(), 50.0);
    }
}
