//! 完成した行を画像ファイルへ書き出す

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::error::{
    ImageFormatHint, ParameterError, ParameterErrorKind, UnsupportedError, UnsupportedErrorKind,
};
use image::{
    ExtendedColorType, ImageBuffer, ImageEncoder, ImageError, ImageFormat, ImageResult, Rgb,
};
use log::debug;

/// 行の書き出し順
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowOrder {
    /// 行 0 を先頭に書く
    TopDown,
    /// 最後の行を先頭に書く（虚軸が上向きになる）
    #[default]
    BottomUp,
}

fn dimension_mismatch() -> ImageError {
    ImageError::Parameter(ParameterError::from_kind(
        ParameterErrorKind::DimensionMismatch,
    ))
}

/// サイズを検査して、指定の順に並べ替えた RGB を返す
fn ordered_rows(
    pixels: &[u8],
    width: usize,
    height: usize,
    order: RowOrder,
) -> ImageResult<(Cow<'_, [u8]>, u32, u32)> {
    let row_len = width.checked_mul(3).ok_or_else(dimension_mismatch)?;
    let len = row_len.checked_mul(height).ok_or_else(dimension_mismatch)?;
    if pixels.len() < len {
        return Err(dimension_mismatch());
    }
    let w = u32::try_from(width).map_err(|_| dimension_mismatch())?;
    let h = u32::try_from(height).map_err(|_| dimension_mismatch())?;

    let pixels = &pixels[..len];
    let rows = match order {
        RowOrder::TopDown => Cow::Borrowed(pixels),
        RowOrder::BottomUp if row_len == 0 => Cow::Borrowed(pixels),
        RowOrder::BottomUp => Cow::Owned(
            pixels
                .chunks_exact(row_len)
                .rev()
                .flatten()
                .copied()
                .collect(),
        ),
    };
    Ok((rows, w, h))
}

/// PNM 系の拡張子に対応するサブタイプ（RGB を表せないものはエラー）
fn pnm_subtype(path: &Path) -> ImageResult<PnmSubtype> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("ppm") => Ok(PnmSubtype::Pixmap(SampleEncoding::Binary)),
        Some("pam") => Ok(PnmSubtype::ArbitraryMap),
        _ => Err(ImageError::Unsupported(
            UnsupportedError::from_format_and_kind(
                ImageFormatHint::Exact(ImageFormat::Pnm),
                UnsupportedErrorKind::Color(ExtendedColorType::Rgb8),
            ),
        )),
    }
}

fn write_pnm<W: Write>(
    writer: W,
    subtype: PnmSubtype,
    pixels: &[u8],
    width: usize,
    height: usize,
    order: RowOrder,
) -> ImageResult<()> {
    let (rows, w, h) = ordered_rows(pixels, width, height, order)?;
    PnmEncoder::new(writer)
        .with_subtype(subtype)
        .write_image(&rows, w, h, ExtendedColorType::Rgb8)
}

/// バイナリ PPM (P6) として書き出す
pub fn write_ppm<W: Write>(
    writer: W,
    pixels: &[u8],
    width: usize,
    height: usize,
    order: RowOrder,
) -> ImageResult<()> {
    let subtype = PnmSubtype::Pixmap(SampleEncoding::Binary);
    write_pnm(writer, subtype, pixels, width, height, order)
}

/// 拡張子から形式を決めて保存する
///
/// .ppm は P6、.pam は P7 (RGB)。.pgm / .pbm は RGB を表せないのでエラー。
pub fn save<P: AsRef<Path>>(
    path: P,
    pixels: &[u8],
    width: usize,
    height: usize,
    order: RowOrder,
) -> ImageResult<()> {
    let path = path.as_ref();
    debug!("save {} ({}x{}, {:?})", path.display(), width, height, order);

    if matches!(ImageFormat::from_path(path), Ok(ImageFormat::Pnm)) {
        let subtype = pnm_subtype(path)?;
        let mut writer = BufWriter::new(File::create(path)?);
        write_pnm(&mut writer, subtype, pixels, width, height, order)?;
        writer.flush()?;
        return Ok(());
    }

    let (rows, w, h) = ordered_rows(pixels, width, height, order)?;
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_raw(w, h, rows.into_owned()).ok_or_else(dimension_mismatch)?;
    img.save(path)
}
