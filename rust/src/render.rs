//! 画像全体の描画（行ごとに `Brot::render_line` を呼ぶ）

use log::{debug, trace};
use rayon::prelude::*;

use crate::common::constants::{
    DEFAULT_HEIGHT, DEFAULT_SAMPLES, DEFAULT_SPAN, DEFAULT_WIDTH, DEFAULT_X_MIN, DEFAULT_Y_MIN,
};
use crate::common::mandelbrot::Brot;

/// 描画する複素平面上の領域と出力サイズ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// 行 0 の左端ピクセル中心の実部
    pub x_min: f64,
    /// 行 0 の虚部（行 j は `y_min + j * pitch`）
    pub y_min: f64,
    /// 1ピクセルの幅
    pub pitch: f64,
    pub width: usize,
    pub height: usize,
    pub samples: usize,
}

impl Region {
    /// 横幅 `span` を `width` ピクセルに割り当てた領域
    pub fn with_span(
        x_min: f64,
        y_min: f64,
        span: f64,
        width: usize,
        height: usize,
        samples: usize,
    ) -> Self {
        Self {
            x_min,
            y_min,
            pitch: span / width as f64,
            width,
            height,
            samples,
        }
    }

    /// 1行のバイト数
    pub fn row_len(&self) -> usize {
        3 * self.width
    }

    /// 画像全体のバイト数
    pub fn buffer_len(&self) -> usize {
        self.row_len() * self.height
    }

    /// 画像全体のバイト数（usize に収まらなければ `None`）
    pub fn checked_buffer_len(&self) -> Option<usize> {
        self.width.checked_mul(3)?.checked_mul(self.height)
    }

    /// 行 `row` の虚部
    pub fn row_y(&self, row: usize) -> f64 {
        self.y_min + row as f64 * self.pitch
    }

    fn render_row(&self, brot: &Brot, row: usize, line: &mut [u8]) {
        trace!("row {}", row);
        brot.render_line(
            self.x_min,
            self.row_y(row),
            self.pitch,
            self.samples,
            self.width,
            line,
        );
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::with_span(
            DEFAULT_X_MIN,
            DEFAULT_Y_MIN,
            DEFAULT_SPAN,
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
            DEFAULT_SAMPLES,
        )
    }
}

/// 1行ずつ順番に描画する
///
/// `pixels` は `region.buffer_len()` バイト以上必要。行 0 が先頭。
pub fn render_image(brot: &Brot, region: &Region, pixels: &mut [u8]) {
    debug!("begin render_image {}x{}", region.width, region.height);
    if region.width == 0 {
        return;
    }
    pixels[..region.buffer_len()]
        .chunks_exact_mut(region.row_len())
        .enumerate()
        .for_each(|(row, line)| region.render_row(brot, row, line));
    debug!("end render_image");
}

/// 行単位で並列に描画する（結果は `render_image` と同一）
pub fn render_image_parallel(brot: &Brot, region: &Region, pixels: &mut [u8]) {
    debug!(
        "begin render_image_parallel {}x{} ({} threads)",
        region.width,
        region.height,
        rayon::current_num_threads()
    );
    if region.width == 0 {
        return;
    }
    pixels[..region.buffer_len()]
        .par_chunks_mut(region.row_len())
        .enumerate()
        .for_each(|(row, line)| region.render_row(brot, row, line));
    debug!("end render_image_parallel");
}

/// 新しいバッファを確保して描画する
pub fn render(brot: &Brot, region: &Region, parallel: bool) -> Vec<u8> {
    let mut pixels = vec![0u8; region.buffer_len()];
    if parallel {
        render_image_parallel(brot, region, &mut pixels);
    } else {
        render_image(brot, region, &mut pixels);
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_region() -> Region {
        Region::with_span(-2.1, -1.2, 3.0, 24, 18, 2)
    }

    #[test]
    fn default_region_matches_driver_constants() {
        let region = Region::default();
        assert_eq!(region.width, 1024);
        assert_eq!(region.height, 1024);
        assert_eq!(region.samples, 4);
        assert_eq!(region.pitch, 0.15 / 1024.0);
        assert_eq!(region.buffer_len(), 3 * 1024 * 1024);
        assert_eq!(region.checked_buffer_len(), Some(3 * 1024 * 1024));
    }

    #[test]
    fn checked_buffer_len_detects_overflow() {
        let wide = Region::with_span(0.0, 0.0, 1.0, usize::MAX / 2, 1, 1);
        assert_eq!(wide.checked_buffer_len(), None);
        let tall = Region::with_span(0.0, 0.0, 1.0, 1 << 20, usize::MAX >> 20, 1);
        assert_eq!(tall.checked_buffer_len(), None);
    }

    #[test]
    fn rows_match_render_line() {
        let brot = Brot::default();
        let region = small_region();
        let pixels = render(&brot, &region, false);

        let mut line = vec![0u8; region.row_len()];
        for row in 0..region.height {
            brot.render_line(
                region.x_min,
                region.row_y(row),
                region.pitch,
                region.samples,
                region.width,
                &mut line,
            );
            let start = row * region.row_len();
            assert_eq!(&pixels[start..start + region.row_len()], &line[..]);
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let brot = Brot::default();
        let region = small_region();
        assert_eq!(render(&brot, &region, true), render(&brot, &region, false));
    }

    #[test]
    fn image_has_both_inside_and_outside_pixels() {
        let pixels = render(&Brot::default(), &small_region(), true);
        let black = pixels.chunks_exact(3).filter(|p| *p == [0u8, 0, 0]).count();
        assert!(black > 0);
        assert!(black < pixels.len() / 3);
    }

    #[test]
    fn empty_region_is_noop() {
        let region = Region::with_span(0.0, 0.0, 1.0, 0, 5, 1);
        assert!(render(&Brot::default(), &region, true).is_empty());
    }
}
