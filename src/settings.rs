//! Conversion Settings & Time Base
//!
//! This module defines the knobs of a conversion run and the mapping from
//! source ticks to output key time.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use pivot_anim::settings::{ConvertSettings, FrameRate};
//!
//! // Default: redundant tracks removed, pivots resampled, document frame rate
//! let settings = ConvertSettings::default();
//!
//! // Force 24 fps output and keep every track
//! let settings = ConvertSettings {
//!     frame_rate: Some(FrameRate::Cinema),
//!     remove_redundant_tracks: false,
//!     ..Default::default()
//! };
//! ```

/// Number of source ticks in one second of FBX time.
pub const FBX_TICKS_PER_SECOND: i64 = 46_186_158_000;

/// Fallback rate used when the document supplies an unusable frame rate.
pub const FALLBACK_FRAMES_PER_SECOND: f64 = 30.0;

// ---------------------------------------------------------------------------
// FrameRate
// ---------------------------------------------------------------------------

/// The enumerated frame-rate table of the source format.
///
/// The discriminant order matches the integer codes stored in the source
/// document's global settings, see [`FrameRate::from_raw`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameRate {
    /// Output time in seconds (one frame per second).
    Default,
    Fps120,
    Fps100,
    Fps60,
    Fps50,
    Fps48,
    Fps30,
    Fps30Drop,
    NtscDropFrame,
    NtscFullFrame,
    Pal,
    Cinema,
    Fps1000,
    CinemaNd,
    /// A user supplied rate in frames per second.
    Custom(f64),
    Fps96,
    Fps72,
    Fps59_94,
    Fps119_88,
}

impl Default for FrameRate {
    #[inline]
    fn default() -> Self {
        Self::Fps30
    }
}

impl FrameRate {
    /// Maps a source frame-rate code to the table.
    ///
    /// `custom` is only consulted for the custom code (14). Unknown codes
    /// fall back to 30 fps.
    #[must_use]
    pub fn from_raw(code: i32, custom: f64) -> Self {
        match code {
            0 => Self::Default,
            1 => Self::Fps120,
            2 => Self::Fps100,
            3 => Self::Fps60,
            4 => Self::Fps50,
            5 => Self::Fps48,
            6 => Self::Fps30,
            7 => Self::Fps30Drop,
            8 => Self::NtscDropFrame,
            9 => Self::NtscFullFrame,
            10 => Self::Pal,
            11 => Self::Cinema,
            12 => Self::Fps1000,
            13 => Self::CinemaNd,
            14 => Self::Custom(custom),
            15 => Self::Fps96,
            16 => Self::Fps72,
            17 => Self::Fps59_94,
            18 => Self::Fps119_88,
            other => {
                log::warn!("Unknown frame rate code {other}, using {FALLBACK_FRAMES_PER_SECOND} fps");
                Self::Fps30
            }
        }
    }

    /// Frames per second of this rate.
    ///
    /// A non-positive or non-finite custom rate falls back to 30 fps.
    #[must_use]
    pub fn frames_per_second(self) -> f64 {
        match self {
            Self::Default => 1.0,
            Self::Fps120 => 120.0,
            Self::Fps100 => 100.0,
            Self::Fps60 => 60.0,
            Self::Fps50 => 50.0,
            Self::Fps48 => 48.0,
            Self::Fps30 | Self::Fps30Drop => 30.0,
            Self::NtscDropFrame | Self::NtscFullFrame => 29.970_026_2,
            Self::Pal => 25.0,
            Self::Cinema => 24.0,
            Self::Fps1000 => 1000.0,
            Self::CinemaNd => 23.976,
            Self::Custom(fps) if fps.is_finite() && fps > 0.0 => fps,
            Self::Custom(fps) => {
                log::warn!("Invalid custom frame rate {fps}, using {FALLBACK_FRAMES_PER_SECOND} fps");
                FALLBACK_FRAMES_PER_SECOND
            }
            Self::Fps96 => 96.0,
            Self::Fps72 => 72.0,
            Self::Fps59_94 => 59.94,
            Self::Fps119_88 => 119.88,
        }
    }
}

// ---------------------------------------------------------------------------
// TimeBase
// ---------------------------------------------------------------------------

/// Converts integer source ticks into output key time (frames).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBase {
    /// Source ticks per second.
    pub ticks_per_second: f64,
    /// Output frames per second.
    pub frames_per_second: f64,
}

impl TimeBase {
    #[must_use]
    pub fn new(ticks_per_second: i64, frame_rate: FrameRate) -> Self {
        let ticks_per_second = if ticks_per_second > 0 {
            ticks_per_second as f64
        } else {
            log::warn!("Invalid tick rate {ticks_per_second}, using the FBX default");
            FBX_TICKS_PER_SECOND as f64
        };
        Self {
            ticks_per_second,
            frames_per_second: frame_rate.frames_per_second(),
        }
    }

    /// Output time of a source tick.
    #[inline]
    #[must_use]
    pub fn tick_to_time(&self, tick: i64) -> f64 {
        tick as f64 * self.frames_per_second / self.ticks_per_second
    }
}

impl Default for TimeBase {
    fn default() -> Self {
        Self::new(FBX_TICKS_PER_SECOND, FrameRate::default())
    }
}

// ---------------------------------------------------------------------------
// ConvertSettings
// ---------------------------------------------------------------------------

/// Options of one conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertSettings {
    /// Overrides the document's frame rate when set.
    pub frame_rate: Option<FrameRate>,
    /// Drop animation components that never leave the static pose.
    pub remove_redundant_tracks: bool,
    /// Re-derive the tracks of animated nodes with a complex pivot chain.
    pub resample_pivots: bool,
    /// Squared distance under which a sample equals the static value.
    pub redundancy_epsilon: f32,
    /// Shift key times so every animation starts at 0.
    pub rebase_key_times: bool,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            frame_rate: None,
            remove_redundant_tracks: true,
            resample_pivots: true,
            redundancy_epsilon: 1e-6,
            rebase_key_times: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_codes_map_to_table() {
        assert_eq!(FrameRate::from_raw(11, 0.0), FrameRate::Cinema);
        assert_eq!(FrameRate::from_raw(14, 12.5), FrameRate::Custom(12.5));
        assert_eq!(FrameRate::from_raw(99, 0.0), FrameRate::Fps30);
    }

    #[test]
    fn invalid_custom_rate_falls_back() {
        assert_eq!(FrameRate::Custom(-1.0).frames_per_second(), 30.0);
        assert_eq!(FrameRate::Custom(f64::NAN).frames_per_second(), 30.0);
    }

    #[test]
    fn one_second_of_ticks_is_one_second_of_frames() {
        let base = TimeBase::new(FBX_TICKS_PER_SECOND, FrameRate::Fps60);
        assert!((base.tick_to_time(FBX_TICKS_PER_SECOND) - 60.0).abs() < 1e-9);
    }
}
