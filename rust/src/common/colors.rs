//! 対数カラースケールと色変換関数

use super::constants::{LINEARITY, MAX_ITER};

/// 8bit チャンネルの上限（255.9 で切り捨て後に 255 へ届く）
const CHANNEL_TOP: f64 = 255.9;

/// 青チャンネルの底上げ量
const BLUE_BASE: f64 = 128.0;

/// 反復回数を輝度へ写す対数スケール
///
/// `offset` と `scale` は `max_iter` と `linearity` から一度だけ計算する。
/// ピクセルごとに作り直さないこと。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    linearity: f64,
    offset: f64,
    scale: f64,
}

impl ColorScale {
    pub fn new(max_iter: u32, linearity: f64) -> Self {
        let offset = linearity.ln();
        let scale = CHANNEL_TOP / ((max_iter as f64 + linearity).ln() - offset);
        Self {
            linearity,
            offset,
            scale,
        }
    }

    pub fn linearity(&self) -> f64 {
        self.linearity
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// 発散した反復回数 `n`（> 0）の輝度 Y
    #[inline]
    pub fn intensity(&self, n: u32) -> f64 {
        ((n as f64 + self.linearity).ln() - self.offset) * self.scale
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::new(MAX_ITER, LINEARITY)
    }
}

/// サブサンプルの色を積算するアキュムレータ
#[derive(Debug, Clone, Copy, Default)]
pub struct RgbAccumulator {
    r: f64,
    g: f64,
    b: f64,
}

impl RgbAccumulator {
    /// 輝度 Y のサンプルを加える（R=G=Y, B=128+Y/2）
    #[inline]
    pub fn add(&mut self, y: f64) {
        self.r += y;
        self.g += y;
        self.b += BLUE_BASE + 0.5 * y;
    }

    /// `weight` 倍して 0〜255 に丸めた RGB を返す
    #[inline]
    pub fn to_rgb(self, weight: f64) -> [u8; 3] {
        [
            to_channel(self.r * weight),
            to_channel(self.g * weight),
            to_channel(self.b * weight),
        ]
    }
}

/// 0〜255 にクランプして切り捨て
#[inline]
fn to_channel(v: f64) -> u8 {
    v.clamp(0.0, 255.0) as u8
}
