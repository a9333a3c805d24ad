// src/main.rs

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use trajviz::config::{PipelineParameters, PlaybackParameters};
use trajviz::models::{AnchorPair, EventKey};
use trajviz::simulation::csv::export_points_csv;
use trajviz::simulation::load_parameters::{load_scenario, load_telemetry, parse_yaml};
use trajviz::{PlaybackStatus, TickOutcome, TrajectorySession};

/// 再生ループの上限フレーム数
const MAX_FRAMES: usize = 10_000_000;

#[derive(Parser, Debug)]
#[command(author, version, about = "Trajectory telemetry projection and playback", long_about = None)]
struct Cli {
    /// シナリオ (テレメトリファイル・発射/目標地点・イベント)
    #[arg(long, default_value = "config/scenario.yaml")]
    scenario: PathBuf,

    /// 投影・再サンプリングのパラメータ
    #[arg(long, default_value = "config/pipeline.yaml")]
    pipeline: PathBuf,

    /// 再生パラメータ
    #[arg(long, default_value = "config/playback.yaml")]
    playback: PathBuf,

    /// 点列の CSV 出力先
    #[arg(short, long, default_value = "output/trajectory.csv")]
    output: PathBuf,

    /// 再生倍率 (省略時は再生パラメータの initial_rate)
    #[arg(long)]
    rate: Option<f64>,

    /// 再生ループの1フレームの長さ (ms)
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// 再生をせず CSV 出力のみ行う
    #[arg(long)]
    no_playback: bool,

    #[arg(short, long)]
    verbose: bool,
}

/// ファイルがあれば読み込み、無ければ既定値を用いる
fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if path.exists() {
        parse_yaml(path).with_context(|| format!("failed to load {}", path.display()))
    } else {
        info!(path = %path.display(), "設定ファイルが無いため既定値を使用します");
        Ok(T::default())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    // 設定とシナリオの読み込み
    let pipeline: PipelineParameters = load_or_default(&cli.pipeline)?;
    let playback: PlaybackParameters = load_or_default(&cli.playback)?;
    let scenario = load_scenario(&cli.scenario)
        .with_context(|| format!("failed to load scenario {}", cli.scenario.display()))?;

    // テレメトリのパスはシナリオファイルからの相対パスとして解決する
    let telemetry_path = if scenario.telemetry.is_absolute() {
        scenario.telemetry.clone()
    } else {
        cli.scenario
            .parent()
            .map(|dir| dir.join(&scenario.telemetry))
            .filter(|p| p.exists())
            .unwrap_or_else(|| scenario.telemetry.clone())
    };
    let series = load_telemetry(&telemetry_path, scenario.source.as_deref())
        .with_context(|| format!("failed to load telemetry {}", telemetry_path.display()))?;

    // セッションの構築
    let mut session = TrajectorySession::new(pipeline, &playback)?;
    session.set_events(scenario.events.clone(), scenario.derive_apogee)?;
    session.set_anchors(AnchorPair::new(scenario.launch, scenario.target))?;
    let token = session
        .load_series(series)?
        .ok_or_else(|| anyhow!("launch and target must both be set in the scenario"))?;

    let trajectory = session.require_trajectory()?;
    export_points_csv(&cli.output, &trajectory.points)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    info!(
        path = %cli.output.display(),
        points = trajectory.points.len(),
        "点列を書き出しました"
    );

    if cli.no_playback {
        return Ok(());
    }

    // 再生ループ (固定フレーム長の模擬クロック)
    if let Some(rate) = cli.rate {
        session.set_rate(rate)?;
    }
    session.play()?;

    let frame = Duration::from_millis(cli.frame_ms.max(1));
    let mut revealed: HashSet<EventKey> = HashSet::new();
    let mut frames = 0usize;

    loop {
        let outcome = session.tick(token, frame);
        frames += 1;

        let trajectory = session.require_trajectory()?;
        for anchored in session.visible_events() {
            if revealed.insert(anchored.key()) {
                if let Some(point) = trajectory.event_point(anchored) {
                    info!(
                        event = %anchored.event.name,
                        index = anchored.resolved_index,
                        time = point.time,
                        lat = point.latitude,
                        lon = point.longitude,
                        alt_m = point.altitude_m,
                        "イベント到達"
                    );
                }
            }
        }

        if let TickOutcome::Advanced { steps, index } = outcome {
            if steps > 0 {
                debug!(frame = frames, index, steps, "再生位置");
            }
        }

        if session.scheduler().status() == PlaybackStatus::Finished || frames >= MAX_FRAMES {
            break;
        }
    }

    let wall_clock = frame * frames as u32;
    if let Some(point) = session.current_point() {
        info!(
            frames,
            wall_clock_s = wall_clock.as_secs_f64(),
            range_km = point.ground_range_km,
            lat = point.latitude,
            lon = point.longitude,
            "再生終了"
        );
    }

    Ok(())
}
