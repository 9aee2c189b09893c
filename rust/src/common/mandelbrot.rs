//! マンデルブロ集合計算関数とスキャンラインレンダラ

use num_complex::Complex;

use super::colors::{ColorScale, RgbAccumulator};
use super::constants::{ESCAPE_RADIUS_SQR, LINEARITY, MAX_ITER};

/// マンデルブロ集合の反復回数を計算（f64版）
///
/// z[i] = z[i-1]^2 + c, z[0] = 0 を z[1] = c から始める。
/// 集合内（`max_iter` 未満で発散しない）なら 0、
/// そうでなければ |z[i]| > 2 となる最小の i（1 <= i < max_iter）を返す。
#[inline]
pub fn escape_time(c: Complex<f64>, max_iter: u32) -> u32 {
    let Complex { re: x, im: y } = c;
    let mut z = c;

    for i in 1..max_iter {
        let a = z.re * z.re;
        let b = z.im * z.im;
        // ちょうど 4.0 は発散扱いにしない
        if a + b > ESCAPE_RADIUS_SQR {
            return i;
        }
        z.im = 2.0 * z.re * z.im + y;
        z.re = a - b + x;
    }
    0
}

/// レンダラの設定（反復上限とそれに対応するカラースケール）
///
/// 反復上限とカラースケールは常に同じ `max_iter` から作られる。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brot {
    max_iter: u32,
    colors: ColorScale,
}

impl Brot {
    pub fn new(max_iter: u32, linearity: f64) -> Self {
        Self {
            max_iter,
            colors: ColorScale::new(max_iter, linearity),
        }
    }

    pub fn max_iter(&self) -> u32 {
        self.max_iter
    }

    pub fn colors(&self) -> &ColorScale {
        &self.colors
    }

    /// 1点の反復回数（0 は集合内）
    #[inline]
    pub fn escape_time(&self, x: f64, y: f64) -> u32 {
        escape_time(Complex::new(x, y), self.max_iter)
    }

    /// 1行分のピクセルを `buffer` に書き込む
    ///
    /// # Arguments
    /// * `x` - 左端ピクセル中心の実部
    /// * `y` - この行の虚部
    /// * `pitch` - 1ピクセルの幅（縦横共通）
    /// * `samples` - スーパーサンプリング数 N（N×N サンプル）
    /// * `columns` - 出力ピクセル数
    /// * `buffer` - 書き込み先（RGB を `3 * columns` バイト）
    ///
    /// `buffer` の先頭 `3 * columns` バイトだけを書き換える。
    /// `buffer` が短い場合は panic する。
    pub fn render_line(
        &self,
        x: f64,
        y: f64,
        pitch: f64,
        samples: usize,
        columns: usize,
        buffer: &mut [u8],
    ) {
        debug_assert!(samples >= 1, "samples must be at least 1");

        let weight = 1.0 / (samples * samples) as f64;
        let delta = pitch / samples as f64;
        let y0 = y - 0.5 * (pitch - delta);

        for (i, pixel) in buffer[..3 * columns].chunks_exact_mut(3).enumerate() {
            let x0 = x + i as f64 * pitch - 0.5 * (pitch - delta);
            let mut acc = RgbAccumulator::default();

            // 座標は delta の逐次加算で進める（乗算にすると結果がずれる）
            let mut y1 = y0;
            for _ in 0..samples {
                let mut x1 = x0;
                for _ in 0..samples {
                    let n = self.escape_time(x1, y1);
                    if n > 0 {
                        acc.add(self.colors.intensity(n));
                    }
                    x1 += delta;
                }
                y1 += delta;
            }

            pixel.copy_from_slice(&acc.to_rgb(weight));
        }
    }
}

impl Default for Brot {
    fn default() -> Self {
        Self::new(MAX_ITER, LINEARITY)
    }
}
