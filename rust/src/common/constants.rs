//! 共通定数

/// 最大反復回数（カラースケールの導出にも使う）
pub const MAX_ITER: u32 = 2048;

/// 対数カラースケールの線形性パラメータ
///
/// 大きいほど低反復回数側が黒に潰れにくくなる
pub const LINEARITY: f64 = 8.0;

/// 発散判定の閾値（|z|^2）
pub const ESCAPE_RADIUS_SQR: f64 = 4.0;

/// 既定の画像幅
pub const DEFAULT_WIDTH: usize = 1024;
/// 既定の画像高さ
pub const DEFAULT_HEIGHT: usize = 1024;

/// 既定のスーパーサンプリング数（1ピクセルあたり N×N）
pub const DEFAULT_SAMPLES: usize = 4;

/// 既定の描画領域（左下ピクセル中心の座標）
pub const DEFAULT_X_MIN: f64 = -0.60;
pub const DEFAULT_Y_MIN: f64 = 0.48;

/// 既定の横方向の幅（pitch = SPAN / 幅）
pub const DEFAULT_SPAN: f64 = 0.15;

/// 既定の出力ファイル名
pub const DEFAULT_OUTPUT: &str = "brot.ppm";
