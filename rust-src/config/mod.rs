//! Configuration and settings for fraudboard.

mod settings;

pub use settings::{LayoutSettings, Settings, DASHBOARD_DATA_PATH, INPUT_POLL_INTERVAL};
