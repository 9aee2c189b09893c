//! マンデルブロ集合スキャンラインレンダラの Python 拡張
//!
//! PyO3 を使用して Python から呼び出し可能な拡張モジュールとして提供

use brot::Brot;
use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2, PyReadwriteArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rayon::prelude::*;

/// 1行ずつ numpy 配列へ描画するレンダラ
#[pyclass]
struct Mandelbrot {
    brot: Brot,
}

#[pymethods]
impl Mandelbrot {
    #[new]
    fn new() -> Self {
        Self {
            brot: Brot::default(),
        }
    }

    /// 1行分の RGB を `buffer` に書き込む
    ///
    /// # Arguments
    /// * `x` - 左端ピクセル中心の実部
    /// * `y` - この行の虚部
    /// * `pitch` - 1ピクセルの幅
    /// * `samples` - スーパーサンプリング数 (N×N)
    /// * `columns` - ピクセル数
    /// * `buffer` - 書き込み先 (連続した 1 次元 uint8 配列, 長さ 3 * columns 以上)
    fn generate(
        &self,
        py: Python<'_>,
        x: f64,
        y: f64,
        pitch: f64,
        samples: usize,
        columns: usize,
        mut buffer: PyReadwriteArray1<'_, u8>,
    ) -> PyResult<()> {
        if samples == 0 {
            return Err(PyValueError::new_err("samples must be at least 1"));
        }
        let line = buffer.as_slice_mut()?;
        if line.len() < 3 * columns {
            return Err(PyValueError::new_err(format!(
                "buffer too small: {} < {}",
                line.len(),
                3 * columns
            )));
        }

        // 描画中は GIL を解放する
        let brot = self.brot;
        py.allow_threads(|| brot.render_line(x, y, pitch, samples, columns, line));
        Ok(())
    }
}

/// 画像全体を描画する
///
/// rayonによる行単位の並列計算
///
/// # Arguments
/// * `x_min` - 左端ピクセル中心の実部
/// * `y_min` - 行 0 の虚部
/// * `pitch` - 1ピクセルの幅
/// * `samples` - スーパーサンプリング数
/// * `width` - 画像幅 (ピクセル)
/// * `height` - 画像高さ (ピクセル)
///
/// # Returns
/// RGB を格納した2次元配列 (height x 3*width)
#[pyfunction]
fn mandelbrot_image(
    py: Python<'_>,
    x_min: f64,
    y_min: f64,
    pitch: f64,
    samples: usize,
    width: usize,
    height: usize,
) -> PyResult<Py<PyArray2<u8>>> {
    if samples == 0 || width == 0 {
        return Err(PyValueError::new_err("samples and width must be at least 1"));
    }

    let brot = Brot::default();
    let row_len = 3 * width;
    let mut result = vec![0u8; row_len * height];

    py.allow_threads(|| {
        result
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(row, line)| {
                let y = y_min + row as f64 * pitch;
                brot.render_line(x_min, y, pitch, samples, width, line);
            });
    });

    let array = Array2::from_shape_vec((height, row_len), result)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(array.into_pyarray(py).into())
}

/// Python モジュール定義
#[pymodule]
fn mandelbrot_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Mandelbrot>()?;
    m.add_function(wrap_pyfunction!(mandelbrot_image, m)?)?;
    Ok(())
}
