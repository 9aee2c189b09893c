//! マンデルブロ集合を PPM などの画像ファイルに描画する
//!
//! 使い方:
//!   brot [出力ファイル] [--width N] [--height N] [--samples N]
//!        [--x-min F] [--y-min F] [--span F] [--parallel] [--top-down]
//!
//! ログは RUST_LOG で調整する（既定は info）。

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use brot::common::constants::*;
use brot::render::{render, Region};
use brot::sink::{self, RowOrder};
use brot::Brot;
use clap::Parser;
use log::{debug, info};

/// コマンドライン引数
#[derive(Parser, Debug)]
#[command(name = "brot", version, about = "スーパーサンプリング付きマンデルブロ集合レンダラ")]
struct Opts {
    /// 出力ファイル（拡張子で形式を決める）
    #[arg(default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// 画像幅（ピクセル）
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    /// 画像高さ（ピクセル）
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: usize,

    /// スーパーサンプリング数（1ピクセルあたり N×N）
    #[arg(long, default_value_t = DEFAULT_SAMPLES)]
    samples: usize,

    /// 左端ピクセル中心の実部
    #[arg(long, default_value_t = DEFAULT_X_MIN, allow_negative_numbers = true)]
    x_min: f64,

    /// 最初の行の虚部
    #[arg(long, default_value_t = DEFAULT_Y_MIN, allow_negative_numbers = true)]
    y_min: f64,

    /// 横方向の幅（複素平面上）
    #[arg(long, default_value_t = DEFAULT_SPAN, allow_negative_numbers = true)]
    span: f64,

    /// 行単位で並列に描画する
    #[arg(long)]
    parallel: bool,

    /// 行 0 を画像の先頭に書く（既定は虚軸が上向き）
    #[arg(long)]
    top_down: bool,
}

impl Opts {
    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("画像サイズは 1 以上にしてください: {}x{}", self.width, self.height);
        }
        if self.samples == 0 {
            bail!("samples は 1 以上にしてください");
        }
        if !(self.span.is_finite() && self.span > 0.0) {
            bail!("span は正の有限値にしてください: {}", self.span);
        }
        if !(self.x_min.is_finite() && self.y_min.is_finite()) {
            bail!("座標は有限値にしてください: ({}, {})", self.x_min, self.y_min);
        }
        if self.region().checked_buffer_len().is_none() {
            bail!("画像サイズが大きすぎます: {}x{}", self.width, self.height);
        }
        Ok(())
    }

    fn region(&self) -> Region {
        Region::with_span(
            self.x_min,
            self.y_min,
            self.span,
            self.width,
            self.height,
            self.samples,
        )
    }

    fn row_order(&self) -> RowOrder {
        if self.top_down {
            RowOrder::TopDown
        } else {
            RowOrder::BottomUp
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = Opts::parse();
    opts.validate()?;
    debug!("{:?}", opts);

    let brot = Brot::default();
    let region = opts.region();
    debug!(
        "max_iter={} linearity={}",
        brot.max_iter(),
        brot.colors().linearity()
    );

    let start = Instant::now();
    let pixels = render(&brot, &region, opts.parallel);
    info!(
        "描画完了 ({}): {:.2?}",
        if opts.parallel { "並列" } else { "逐次" },
        start.elapsed()
    );

    sink::save(&opts.output, &pixels, region.width, region.height, opts.row_order())
        .with_context(|| format!("画像の保存に失敗しました: {}", opts.output.display()))?;
    info!("画像を保存しました: {}", opts.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Opts {
        Opts::try_parse_from(std::iter::once("brot").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_constants() {
        let opts = parse(&[]);
        opts.validate().unwrap();
        assert_eq!(opts.output, PathBuf::from("brot.ppm"));
        assert_eq!(opts.region(), Region::default());
        assert_eq!(opts.row_order(), RowOrder::BottomUp);
    }

    #[test]
    fn accepts_negative_coordinates() {
        let opts = parse(&["out.png", "--x-min", "-2.0", "--y-min", "-1.5", "--top-down"]);
        opts.validate().unwrap();
        assert_eq!(opts.x_min, -2.0);
        assert_eq!(opts.y_min, -1.5);
        assert_eq!(opts.row_order(), RowOrder::TopDown);
    }

    #[test]
    fn rejects_invalid_sizes() {
        assert!(parse(&["--width", "0"]).validate().is_err());
        assert!(parse(&["--samples", "0"]).validate().is_err());
        assert!(parse(&["--span", "0"]).validate().is_err());
        assert!(parse(&["--span", "-1.0"]).validate().is_err());
    }

    #[test]
    fn rejects_overflowing_dimensions() {
        let huge = (usize::MAX / 2).to_string();
        let opts = parse(&["--width", huge.as_str(), "--height", "2"]);
        let err = opts.validate().unwrap_err();
        assert!(err.to_string().contains("大きすぎます"), "{}", err);
    }
}
