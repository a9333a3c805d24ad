// src/config/scenario.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::models::flight_event::FlightEvent;
use crate::models::geo_anchor::GeoAnchor;

/// 1回分の再生シナリオ (テレメトリファイルと発射・目標地点、イベント時刻)
#[derive(Debug, Deserialize, Clone)]
pub struct Scenario {
    pub telemetry: PathBuf,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub launch: Option<GeoAnchor>,
    #[serde(default)]
    pub target: Option<GeoAnchor>,
    #[serde(default)]
    pub events: Vec<FlightEvent>,
    #[serde(default = "default_derive_apogee")]
    pub derive_apogee: bool,
}

fn default_derive_apogee() -> bool {
    true
}
