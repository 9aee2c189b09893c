//! スーパーサンプリング付きマンデルブロ集合レンダラ
//!
//! 1行ずつ呼び出し側のバッファへ RGB を書き込む。
//! 行同士は独立しているので、行単位で並列化できる。

pub mod common;
pub mod ffi;
pub mod render;
pub mod sink;

pub use common::mandelbrot::Brot;
pub use render::Region;
pub use sink::RowOrder;
