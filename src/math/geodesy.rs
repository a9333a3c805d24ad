// src/math/geodesy.rs

/// WGS84 赤道半径を球の半径として用いる (m)
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// 発射地点と目標地点が同一とみなす角度差 (度)
const COINCIDENT_EPS_DEG: f64 = 1e-12;

/// 角度を [0, 360) に正規化する
pub fn normalize_bearing(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid は -0.0 付近で 360.0 を返すことがある
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// 経度を [-180, 180) に正規化する
pub fn normalize_longitude(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

/// 球面上の初期方位角 (前方方位角) を計算する純粋関数
///
/// # 引数
/// - `lat1`, `lon1`: 出発点の緯度・経度 (度)
/// - `lat2`, `lon2`: 到達点の緯度・経度 (度)
///
/// # 戻り値
/// - 北から時計回りの方位角 [0, 360) (度)。2点が一致する場合は 0
pub fn initial_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    if (lat1 - lat2).abs() < COINCIDENT_EPS_DEG && (lon1 - lon2).abs() < COINCIDENT_EPS_DEG {
        return 0.0;
    }

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    if y == 0.0 && x == 0.0 {
        return 0.0;
    }

    normalize_bearing(y.atan2(x).to_degrees())
}

/// 出発点から方位角・距離だけ進んだ地点を計算する純粋関数
///
/// # 引数
/// - `lat`, `lon`: 出発点の緯度・経度 (度)
/// - `bearing_deg`: 方位角 (度)
/// - `distance_m`: 大円距離 (m)
/// - `radius_m`: 球の半径 (m)
///
/// # 戻り値
/// - 到達点の (緯度, 経度) (度)。経度は [-180, 180) に正規化
pub fn destination_point(
    lat: f64,
    lon: f64,
    bearing_deg: f64,
    distance_m: f64,
    radius_m: f64,
) -> (f64, f64) {
    if distance_m == 0.0 {
        return (lat, lon);
    }

    let delta = distance_m / radius_m;
    let theta = bearing_deg.to_radians();
    let phi1 = lat.to_radians();
    let lambda1 = lon.to_radians();

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * sin_phi2);

    (phi2.to_degrees(), normalize_longitude(lambda2.to_degrees()))
}

/// ハーバサイン公式による大円距離 (m)
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64, radius_m: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * radius_m * a.sqrt().clamp(0.0, 1.0).asin()
}
