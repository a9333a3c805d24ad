// src/models/geo_anchor.rs

use serde::{Deserialize, Serialize};

use crate::math::error::{AnchorRole, TrajectoryError, TrajectoryResult};

/// 地表上の基準点 (緯度・経度は度)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoAnchor {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoAnchor {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// 発射地点と目標地点の組。どちらも未設定でありうる
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnchorPair {
    pub launch: Option<GeoAnchor>,
    pub target: Option<GeoAnchor>,
}

impl AnchorPair {
    pub fn new(launch: Option<GeoAnchor>, target: Option<GeoAnchor>) -> Self {
        Self { launch, target }
    }

    /// 両方が設定済みであれば (launch, target) を返す
    pub fn require(&self) -> TrajectoryResult<(GeoAnchor, GeoAnchor)> {
        let launch = self
            .launch
            .ok_or(TrajectoryError::MissingAnchor(AnchorRole::Launch))?;
        let target = self
            .target
            .ok_or(TrajectoryError::MissingAnchor(AnchorRole::Target))?;
        Ok((launch, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_reports_missing_role() {
        let pair = AnchorPair::new(None, Some(GeoAnchor::new(1.0, 2.0)));
        assert!(matches!(
            pair.require(),
            Err(TrajectoryError::MissingAnchor(AnchorRole::Launch))
        ));

        let pair = AnchorPair::new(Some(GeoAnchor::new(1.0, 2.0)), None);
        assert!(matches!(
            pair.require(),
            Err(TrajectoryError::MissingAnchor(AnchorRole::Target))
        ));
    }

    #[test]
    fn test_require_both_set() {
        let launch = GeoAnchor::new(35.0, 139.0);
        let target = GeoAnchor::new(36.0, 140.0);
        let (l, t) = AnchorPair::new(Some(launch), Some(target)).require().unwrap();
        assert_eq!(l, launch);
        assert_eq!(t, target);
    }
}
