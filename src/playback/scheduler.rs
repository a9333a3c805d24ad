// src/playback/scheduler.rs

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::parameters::PlaybackParameters;
use crate::math::error::{OutOfRangeSeek, TrajectoryError, TrajectoryResult};

/// 蓄積時間と閾値の比較に用いる許容誤差 (閾値に対する比)
const ACCUMULATOR_REL_EPS: f64 = 1e-9;

/// 再生状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// 系列未ロード
    Idle,
    /// ロード済み、インデックス 0 で停止中
    Ready,
    Playing,
    Paused,
    /// 最終インデックスに到達
    Finished,
}

/// ロードごとに発行される世代番号。古い世代の tick は無視される
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionToken(u64);

/// 描画側へ公開する再生状態
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub current_index: usize,
    pub is_playing: bool,
    pub rate_multiplier: f64,
}

/// シーク結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekOutcome {
    Exact(usize),
    /// 範囲外だったためクランプした
    Clamped { index: usize, error: OutOfRangeSeek },
}

impl SeekOutcome {
    pub fn index(&self) -> usize {
        match self {
            SeekOutcome::Exact(index) => *index,
            SeekOutcome::Clamped { index, .. } => *index,
        }
    }

    pub fn was_clamped(&self) -> bool {
        matches!(self, SeekOutcome::Clamped { .. })
    }
}

/// tick の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// 再生中でないため何もしなかった
    NotPlaying,
    /// 既に置き換えられたセッションの tick
    Stale,
    /// `steps` だけ進んだ (0 もありうる)
    Advanced { steps: usize, index: usize },
    /// 最終インデックスに到達して停止した
    Finished { index: usize },
}

/// 実時間に合わせて現在インデックスを進めるスケジューラ
///
/// 経過時間に倍率を掛けて蓄積し、閾値の整数倍ぶんだけインデックスを進める。消費しなかった端数は
/// 次の tick に持ち越すため、tick の呼び出し頻度によらず進み方は一定になる。
#[derive(Debug, Clone)]
pub struct PlaybackScheduler {
    status: PlaybackStatus,
    len: usize,
    current_index: usize,
    rate: f64,
    threshold_ms: f64,
    accumulator_ms: f64,
    generation: u64,
}

fn validate_rate(rate: f64) -> TrajectoryResult<f64> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(rate)
    } else {
        Err(TrajectoryError::InvalidParameter(format!(
            "再生倍率は 0 以上の有限値である必要があります: {}",
            rate
        )))
    }
}

impl PlaybackScheduler {
    pub fn new(params: &PlaybackParameters) -> TrajectoryResult<Self> {
        if !params.tick_threshold_ms.is_finite() || params.tick_threshold_ms <= 0.0 {
            return Err(TrajectoryError::InvalidParameter(format!(
                "tick_threshold_ms は正の値である必要があります: {}",
                params.tick_threshold_ms
            )));
        }
        Ok(Self {
            status: PlaybackStatus::Idle,
            len: 0,
            current_index: 0,
            rate: validate_rate(params.initial_rate)?,
            threshold_ms: params.tick_threshold_ms,
            accumulator_ms: 0.0,
            generation: 0,
        })
    }

    /// 新しい系列をロードする。以前の状態は破棄され、古いトークンは無効になる
    ///
    /// # 引数
    /// - `len`: 系列長
    ///
    /// # 戻り値
    /// - 新しいセッションのトークン。`len == 0` の場合は `EmptySeries` (状態は Idle になる)
    pub fn load(&mut self, len: usize) -> TrajectoryResult<SessionToken> {
        self.generation += 1;
        self.current_index = 0;
        self.accumulator_ms = 0.0;
        if len == 0 {
            self.len = 0;
            self.status = PlaybackStatus::Idle;
            return Err(TrajectoryError::EmptySeries);
        }
        self.len = len;
        self.status = PlaybackStatus::Ready;
        debug!(generation = self.generation, len, "再生系列をロードしました");
        Ok(SessionToken(self.generation))
    }

    /// 系列を破棄して Idle に戻る
    pub fn unload(&mut self) {
        self.generation += 1;
        self.len = 0;
        self.current_index = 0;
        self.accumulator_ms = 0.0;
        self.status = PlaybackStatus::Idle;
    }

    /// 現在のセッションのトークン (Idle なら None)
    pub fn token(&self) -> Option<SessionToken> {
        match self.status {
            PlaybackStatus::Idle => None,
            _ => Some(SessionToken(self.generation)),
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            current_index: self.current_index,
            is_playing: self.is_playing(),
            rate_multiplier: self.rate,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    fn last_index(&self) -> usize {
        self.len.saturating_sub(1)
    }

    fn ensure_loaded(&self) -> TrajectoryResult<()> {
        match self.status {
            PlaybackStatus::Idle => Err(TrajectoryError::EmptySeries),
            _ => Ok(()),
        }
    }

    /// 再生を開始する。Finished から呼んだ場合もインデックスは戻さない
    pub fn play(&mut self) -> TrajectoryResult<()> {
        self.ensure_loaded()?;
        if self.status != PlaybackStatus::Playing {
            debug!(from = ?self.status, index = self.current_index, "再生開始");
            self.status = PlaybackStatus::Playing;
        }
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.status == PlaybackStatus::Playing {
            self.status = PlaybackStatus::Paused;
        }
    }

    /// インデックス 0 の Ready に戻す
    pub fn reset(&mut self) -> TrajectoryResult<()> {
        self.ensure_loaded()?;
        self.current_index = 0;
        self.accumulator_ms = 0.0;
        self.status = PlaybackStatus::Ready;
        Ok(())
    }

    /// 指定インデックスへ移動して停止する。範囲外は [0, len-1] にクランプする
    ///
    /// インデックス 0 へのシークは Ready、それ以外は Paused になる。
    pub fn seek(&mut self, index: usize) -> TrajectoryResult<SeekOutcome> {
        self.ensure_loaded()?;
        let outcome = if index > self.last_index() {
            let error = OutOfRangeSeek {
                requested: index as f64,
                len: self.len,
            };
            warn!(%error, "シーク位置をクランプしました");
            SeekOutcome::Clamped {
                index: self.last_index(),
                error,
            }
        } else {
            SeekOutcome::Exact(index)
        };
        self.jump_to(outcome.index());
        Ok(outcome)
    }

    /// 系列全体に対する割合 [0, 1] でシークする
    pub fn seek_fraction(&mut self, fraction: f64) -> TrajectoryResult<SeekOutcome> {
        self.ensure_loaded()?;
        let last = self.last_index();
        let outcome = if fraction.is_finite() && (0.0..=1.0).contains(&fraction) {
            SeekOutcome::Exact((fraction * last as f64).round() as usize)
        } else {
            let error = OutOfRangeSeek {
                requested: fraction,
                len: self.len,
            };
            warn!(%error, "シーク割合をクランプしました");
            let index = if fraction > 1.0 { last } else { 0 };
            SeekOutcome::Clamped { index, error }
        };
        self.jump_to(outcome.index());
        Ok(outcome)
    }

    fn jump_to(&mut self, index: usize) {
        self.current_index = index;
        self.accumulator_ms = 0.0;
        self.status = if index == 0 {
            PlaybackStatus::Ready
        } else {
            PlaybackStatus::Paused
        };
    }

    /// 再生倍率を変更する (状態は変えない)
    pub fn set_rate(&mut self, multiplier: f64) -> TrajectoryResult<()> {
        self.rate = validate_rate(multiplier)?;
        Ok(())
    }

    /// 実経過時間だけ再生を進める
    pub fn tick(&mut self, token: SessionToken, elapsed: Duration) -> TickOutcome {
        self.tick_ms(token, elapsed.as_nanos() as f64 / 1_000_000.0)
    }

    /// 実経過時間 (ms) だけ再生を進める
    ///
    /// # 引数
    /// - `token`: tick を発行したセッション
    /// - `elapsed_ms`: 前回の tick からの実経過時間 (ms)。負値・非有限値は 0 とみなす
    ///
    /// # 戻り値
    /// - 進んだステップ数などの結果
    pub fn tick_ms(&mut self, token: SessionToken, elapsed_ms: f64) -> TickOutcome {
        if token.0 != self.generation {
            warn!(
                stale = token.0,
                current = self.generation,
                "置き換え済みセッションの tick を無視しました"
            );
            return TickOutcome::Stale;
        }
        if self.status != PlaybackStatus::Playing {
            return TickOutcome::NotPlaying;
        }

        let last = self.last_index();
        if self.current_index >= last {
            self.finish();
            return TickOutcome::Finished {
                index: self.current_index,
            };
        }

        let elapsed_ms = if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            elapsed_ms
        } else {
            0.0
        };
        self.accumulator_ms += elapsed_ms * self.rate;

        let whole = (self.accumulator_ms / self.threshold_ms + ACCUMULATOR_REL_EPS).floor();
        if whole < 1.0 {
            return TickOutcome::Advanced {
                steps: 0,
                index: self.current_index,
            };
        }
        self.accumulator_ms = (self.accumulator_ms - whole * self.threshold_ms).max(0.0);

        let remaining = last - self.current_index;
        let steps = if whole >= remaining as f64 {
            remaining
        } else {
            whole as usize
        };
        self.current_index += steps;

        if self.current_index >= last {
            self.finish();
            TickOutcome::Finished {
                index: self.current_index,
            }
        } else {
            TickOutcome::Advanced {
                steps,
                index: self.current_index,
            }
        }
    }

    fn finish(&mut self) {
        self.current_index = self.last_index();
        self.accumulator_ms = 0.0;
        self.status = PlaybackStatus::Finished;
        debug!(index = self.current_index, "再生終了");
    }
}
