// src/models/flight_event.rs

use serde::{Deserialize, Serialize};

/// イベントマーカーの表示形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStyle {
    #[default]
    Marker,
    Flag,
    Pulse,
}

/// 燃焼終了・段分離・頂点などの飛行イベント
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightEvent {
    pub name: String,
    pub time: f64, // 先頭サンプルからの経過時間
    #[serde(default)]
    pub display_style: DisplayStyle,
}

impl FlightEvent {
    pub fn new(name: impl Into<String>, time: f64) -> Self {
        Self {
            name: name.into(),
            time,
            display_style: DisplayStyle::default(),
        }
    }

    pub fn with_style(mut self, style: DisplayStyle) -> Self {
        self.display_style = style;
        self
    }
}

/// 描画側の差分計算に使う安定した識別子
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey {
    pub name: String,
    pub index: usize,
}

/// 系列上のインデックスに対応付けたイベント
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchoredEvent {
    pub event: FlightEvent,
    pub resolved_index: usize,
}

impl AnchoredEvent {
    pub fn key(&self) -> EventKey {
        EventKey {
            name: self.event.name.clone(),
            index: self.resolved_index,
        }
    }

    /// 現在インデックスがイベント位置に達していれば表示する
    pub fn is_visible(&self, current_index: usize) -> bool {
        current_index >= self.resolved_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_gate() {
        let anchored = AnchoredEvent {
            event: FlightEvent::new("burnout", 12.0),
            resolved_index: 4,
        };
        assert!(!anchored.is_visible(3));
        assert!(anchored.is_visible(4));
        assert!(anchored.is_visible(10));
    }

    #[test]
    fn test_key_identifies_name_and_index() {
        let a = AnchoredEvent {
            event: FlightEvent::new("apogee", 100.0).with_style(DisplayStyle::Pulse),
            resolved_index: 7,
        };
        let b = AnchoredEvent {
            event: FlightEvent::new("apogee", 100.2),
            resolved_index: 7,
        };
        assert_eq!(a.key(), b.key());
        assert_ne!(
            a.key(),
            EventKey {
                name: "apogee".to_string(),
                index: 8
            }
        );
    }
}
