//! C から呼び出すための薄いラッパー
//!
//! 共有ライブラリ (libbrot.so) として ctypes などから読み込む。
//! シンボル名は `brot_new` / `generate` / `brot_delete`。

use std::os::raw::{c_double, c_int, c_uchar};
use std::slice;

use crate::common::mandelbrot::Brot;

/// 既定設定のレンダラを確保する（`brot_delete` で解放すること）
#[no_mangle]
pub extern "C" fn brot_new() -> *mut Brot {
    Box::into_raw(Box::new(Brot::default()))
}

/// 1行を `buffer` に描画する
///
/// ポインタが null、または `samples` / `columns` が正でなければ何もしない。
///
/// # Safety
/// `brot` は `brot_new` が返した解放前のポインタ、
/// `buffer` は `3 * columns` バイト以上書き込める領域であること。
#[no_mangle]
pub unsafe extern "C" fn generate(
    brot: *const Brot,
    x: c_double,
    y: c_double,
    pitch: c_double,
    samples: c_int,
    columns: c_int,
    buffer: *mut c_uchar,
) {
    if brot.is_null() || buffer.is_null() || samples <= 0 || columns <= 0 {
        return;
    }
    let columns = columns as usize;
    let line = slice::from_raw_parts_mut(buffer, 3 * columns);
    (*brot).render_line(x, y, pitch, samples as usize, columns, line);
}

/// `brot_new` で確保したレンダラを解放する
///
/// # Safety
/// `brot` は `brot_new` が返したポインタで、まだ解放していないこと（null は無視）。
#[no_mangle]
pub unsafe extern "C" fn brot_delete(brot: *mut Brot) {
    if !brot.is_null() {
        drop(Box::from_raw(brot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_matches_render_line() {
        let mut expected = vec![0u8; 3 * 8];
        Brot::default().render_line(-0.6, 0.48, 0.001, 2, 8, &mut expected);

        let mut buffer = vec![0xFFu8; 3 * 8 + 3];
        unsafe {
            let brot = brot_new();
            generate(brot, -0.6, 0.48, 0.001, 2, 8, buffer.as_mut_ptr());
            brot_delete(brot);
        }
        assert_eq!(&buffer[..3 * 8], &expected[..]);
        assert_eq!(&buffer[3 * 8..], &[0xFFu8; 3]);
    }

    #[test]
    fn invalid_arguments_leave_buffer_untouched() {
        let mut buffer = [9u8; 6];
        unsafe {
            let brot = brot_new();
            generate(std::ptr::null(), 0.0, 0.0, 0.1, 1, 2, buffer.as_mut_ptr());
            generate(brot, 0.0, 0.0, 0.1, 0, 2, buffer.as_mut_ptr());
            generate(brot, 0.0, 0.0, 0.1, 1, -1, buffer.as_mut_ptr());
            generate(brot, 0.0, 0.0, 0.1, 1, 2, std::ptr::null_mut());
            brot_delete(brot);
            brot_delete(std::ptr::null_mut());
        }
        assert_eq!(buffer, [9u8; 6]);
    }
}
