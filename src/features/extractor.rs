//! Feature extraction: session record → zone/tap/swipe/screen statistics → vector.

use super::stats::{mean, mean_std};
use super::zone::zone_to_xy;
use super::FeatureVector;
use crate::error::ExtractError;
use crate::session::{SessionRecord, TapEvent};
use std::collections::BTreeSet;

pub struct FeatureExtractor {
    label: u8,
}

impl FeatureExtractor {
    /// `label` is stamped on every vector; sessions do not carry their own class.
    pub fn new(label: u8) -> Self {
        Self { label }
    }

    pub fn label(&self) -> u8 {
        self.label
    }

    /// Parse and extract one serialized session.
    pub fn extract_json(&self, data: &str) -> Result<FeatureVector, ExtractError> {
        let record = SessionRecord::from_json(data)?;
        Ok(self.extract(&record))
    }

    pub fn extract(&self, record: &SessionRecord) -> FeatureVector {
        let duration = record.session.duration_seconds;
        let (mean_tap, std_tap) = mean_std(&record.tap_durations_ms);
        let tap_frequency = tap_frequency(record.tap_events.len(), duration);

        let (tap_zone_x, tap_zone_y) = zone_centroid(record.tap_events.iter());

        let speeds: Vec<f64> = record
            .swipe_events
            .iter()
            .filter_map(|s| s.speed_px_per_ms)
            .filter(|v| v.is_finite())
            .collect();
        let distances: Vec<f64> = record
            .swipe_events
            .iter()
            .filter_map(|s| s.distance_px)
            .filter(|v| v.is_finite())
            .collect();
        let (mean_speed, std_speed) = mean_std(&speeds);
        let (mean_distance, std_distance) = mean_std(&distances);

        // Swipes carry no zone: use taps on the screens where swipes happened.
        let swipe_screens: BTreeSet<&str> = record
            .swipe_events
            .iter()
            .filter_map(|s| s.screen.as_deref())
            .filter(|s| !s.is_empty())
            .collect();
        let (swipe_zone_x, swipe_zone_y) = zone_centroid(
            record
                .tap_events
                .iter()
                .filter(|t| t.screen.as_deref().is_some_and(|s| swipe_screens.contains(s))),
        );

        let screen_values: Vec<f64> = record.screen_durations.values().copied().collect();
        let (mean_screen, std_screen) = mean_std(&screen_values);

        let input = &record.session_input;
        FeatureVector {
            session_duration_seconds: duration,
            mean_tap_duration_ms: mean_tap,
            std_tap_duration_ms: std_tap,
            tap_frequency_per_sec: tap_frequency,
            mean_swipe_speed: mean_speed,
            std_swipe_speed: std_speed,
            mean_swipe_distance: mean_distance,
            std_swipe_distance: std_distance,
            tap_zone_x,
            tap_zone_y,
            swipe_zone_x,
            swipe_zone_y,
            mean_screen_duration: mean_screen,
            std_screen_duration: std_screen,
            fd_broken: u8::from(input.fd_broken),
            loan_taken: u8::from(input.loan_taken),
            time_from_login_to_fd: input.time_from_login_to_fd,
            time_from_login_to_loan: input.time_from_login_to_loan,
            time_from_login_transaction: input.time_from_login_to_transaction,
            label: self.label,
        }
    }
}

/// Taps per second; undefined unless the duration is known and positive.
fn tap_frequency(taps: usize, duration: Option<f64>) -> Option<f64> {
    match duration {
        Some(d) if d > 0.0 => Some(taps as f64 / d),
        _ => None,
    }
}

/// Mean grid position over taps with a recognized zone.
fn zone_centroid<'a>(taps: impl Iterator<Item = &'a TapEvent>) -> (Option<f64>, Option<f64>) {
    let (xs, ys): (Vec<f64>, Vec<f64>) = taps
        .filter_map(|t| t.zone.as_deref().and_then(zone_to_xy))
        .map(|p| (p.x as f64, p.y as f64))
        .unzip();
    (mean(&xs), mean(&ys))
}
