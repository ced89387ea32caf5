//! Session record → fixed 19-feature vector.

mod extractor;
pub mod stats;
pub mod zone;

pub use extractor::FeatureExtractor;
pub use zone::{zone_to_xy, ZonePoint};

use serde::{Deserialize, Serialize};

/// Column names, in table order.
pub mod columns {
    pub const SESSION_DURATION: &str = "session_duration_seconds";
    pub const MEAN_TAP_DURATION: &str = "mean_tap_duration_ms";
    pub const STD_TAP_DURATION: &str = "std_tap_duration_ms";
    pub const TAP_FREQUENCY: &str = "tap_frequency_per_sec";
    pub const MEAN_SWIPE_SPEED: &str = "mean_swipe_speed";
    pub const STD_SWIPE_SPEED: &str = "std_swipe_speed";
    pub const MEAN_SWIPE_DISTANCE: &str = "mean_swipe_distance";
    pub const STD_SWIPE_DISTANCE: &str = "std_swipe_distance";
    pub const TAP_ZONE_X: &str = "tap_zone_x";
    pub const TAP_ZONE_Y: &str = "tap_zone_y";
    pub const SWIPE_ZONE_X: &str = "swipe_zone_x";
    pub const SWIPE_ZONE_Y: &str = "swipe_zone_y";
    pub const MEAN_SCREEN_DURATION: &str = "mean_screen_duration";
    pub const STD_SCREEN_DURATION: &str = "std_screen_duration";
    pub const FD_BROKEN: &str = "fd_broken";
    pub const LOAN_TAKEN: &str = "loan_taken";
    pub const TIME_TO_FD: &str = "time_from_login_to_fd";
    pub const TIME_TO_LOAN: &str = "time_from_login_to_loan";
    pub const TIME_TO_TRANSACTION: &str = "time_from_login_transaction";
    pub const LABEL: &str = "label";

    /// Binary flags; never perturbed.
    pub const FLAG_COLUMNS: [&str; 2] = [FD_BROKEN, LOAN_TAKEN];

    /// Continuous telemetry-derived columns touched by evaluation-time noise.
    pub const NOISE_COLUMNS: [&str; 17] = [
        SESSION_DURATION,
        MEAN_TAP_DURATION,
        STD_TAP_DURATION,
        TAP_FREQUENCY,
        MEAN_SWIPE_SPEED,
        STD_SWIPE_SPEED,
        MEAN_SWIPE_DISTANCE,
        STD_SWIPE_DISTANCE,
        TAP_ZONE_X,
        TAP_ZONE_Y,
        SWIPE_ZONE_X,
        SWIPE_ZONE_Y,
        MEAN_SCREEN_DURATION,
        STD_SCREEN_DURATION,
        TIME_TO_FD,
        TIME_TO_LOAN,
        TIME_TO_TRANSACTION,
    ];
}

/// Model input columns, order-significant.
pub const FEATURE_COLUMNS: [&str; 19] = [
    columns::SESSION_DURATION,
    columns::MEAN_TAP_DURATION,
    columns::STD_TAP_DURATION,
    columns::TAP_FREQUENCY,
    columns::MEAN_SWIPE_SPEED,
    columns::STD_SWIPE_SPEED,
    columns::MEAN_SWIPE_DISTANCE,
    columns::STD_SWIPE_DISTANCE,
    columns::TAP_ZONE_X,
    columns::TAP_ZONE_Y,
    columns::SWIPE_ZONE_X,
    columns::SWIPE_ZONE_Y,
    columns::MEAN_SCREEN_DURATION,
    columns::STD_SCREEN_DURATION,
    columns::FD_BROKEN,
    columns::LOAN_TAKEN,
    columns::TIME_TO_FD,
    columns::TIME_TO_LOAN,
    columns::TIME_TO_TRANSACTION,
];

/// Persisted table columns: the 19 features followed by `label`.
pub const TABLE_COLUMNS: [&str; 20] = [
    columns::SESSION_DURATION,
    columns::MEAN_TAP_DURATION,
    columns::STD_TAP_DURATION,
    columns::TAP_FREQUENCY,
    columns::MEAN_SWIPE_SPEED,
    columns::STD_SWIPE_SPEED,
    columns::MEAN_SWIPE_DISTANCE,
    columns::STD_SWIPE_DISTANCE,
    columns::TAP_ZONE_X,
    columns::TAP_ZONE_Y,
    columns::SWIPE_ZONE_X,
    columns::SWIPE_ZONE_Y,
    columns::MEAN_SCREEN_DURATION,
    columns::STD_SCREEN_DURATION,
    columns::FD_BROKEN,
    columns::LOAN_TAKEN,
    columns::TIME_TO_FD,
    columns::TIME_TO_LOAN,
    columns::TIME_TO_TRANSACTION,
    columns::LABEL,
];

/// One session's summary. `None` marks a statistic that is undefined for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub session_duration_seconds: Option<f64>,
    pub mean_tap_duration_ms: Option<f64>,
    pub std_tap_duration_ms: Option<f64>,
    pub tap_frequency_per_sec: Option<f64>,
    pub mean_swipe_speed: Option<f64>,
    pub std_swipe_speed: Option<f64>,
    pub mean_swipe_distance: Option<f64>,
    pub std_swipe_distance: Option<f64>,
    pub tap_zone_x: Option<f64>,
    pub tap_zone_y: Option<f64>,
    pub swipe_zone_x: Option<f64>,
    pub swipe_zone_y: Option<f64>,
    pub mean_screen_duration: Option<f64>,
    pub std_screen_duration: Option<f64>,
    pub fd_broken: u8,
    pub loan_taken: u8,
    pub time_from_login_to_fd: Option<f64>,
    pub time_from_login_to_loan: Option<f64>,
    pub time_from_login_transaction: Option<f64>,
    pub label: u8,
}

impl FeatureVector {
    /// Cells in [`TABLE_COLUMNS`] order.
    pub fn to_row(&self) -> Vec<Option<f64>> {
        vec![
            self.session_duration_seconds,
            self.mean_tap_duration_ms,
            self.std_tap_duration_ms,
            self.tap_frequency_per_sec,
            self.mean_swipe_speed,
            self.std_swipe_speed,
            self.mean_swipe_distance,
            self.std_swipe_distance,
            self.tap_zone_x,
            self.tap_zone_y,
            self.swipe_zone_x,
            self.swipe_zone_y,
            self.mean_screen_duration,
            self.std_screen_duration,
            Some(self.fd_broken as f64),
            Some(self.loan_taken as f64),
            self.time_from_login_to_fd,
            self.time_from_login_to_loan,
            self.time_from_login_transaction,
            Some(self.label as f64),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_columns_extend_feature_columns_with_label() {
        assert_eq!(&TABLE_COLUMNS[..19], &FEATURE_COLUMNS[..]);
        assert_eq!(TABLE_COLUMNS[19], columns::LABEL);
    }

    #[test]
    fn noise_columns_exclude_flags_and_label() {
        for c in columns::FLAG_COLUMNS.iter().chain([columns::LABEL].iter()) {
            assert!(!columns::NOISE_COLUMNS.contains(c));
        }
    }
}
