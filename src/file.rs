//! Reading and writing of image files
//!
//! Format is selected from the file extension by the `image` crate; PNG
//! support is built in.

use crate::pixfmt::Format;
use crate::error::Result;

use image::ExtendedColorType;
use log::debug;

use std::path::Path;

/// Read an image as RGBA, 4 bytes per pixel
///
/// Returns the data, width and height
pub fn read_file<P: AsRef<Path>>(filename: P) -> Result<(Vec<u8>,usize,usize)> {
    let img = image::open(filename)?.to_rgba8();
    let (w, h) = img.dimensions();
    let buf = img.into_raw();
    Ok((buf, w as usize, h as usize))
}

/// Write pixel data of format `T` to an image file
pub fn write_file<T: Format, P: AsRef<Path>>(buf: &[u8], width: usize, height: usize, filename: P) -> Result<()> {
    let color = if T::bpp() == 4 { ExtendedColorType::Rgba8 } else { ExtendedColorType::Rgb8 };
    image::save_buffer(filename, buf, width as u32, height as u32, color)?;
    Ok(())
}

/// Compare two image files pixel by pixel
///
/// Returns true if the images have the same size and pixels
pub fn img_diff<P: AsRef<Path>>(f1: P, f2: P) -> Result<bool> {
    let (d1,w1,h1) = read_file(f1)?;
    let (d2,w2,h2) = read_file(f2)?;
    if w1 != w2 || h1 != h2 {
        debug!("IMG_DIFF: size {}x{} != {}x{}", w1, h1, w2, h2);
        return Ok(false);
    }
    let mut flag = true;
    for (i,(v1,v2)) in d1.iter().zip(d2.iter()).enumerate() {
        if v1 != v2 {
            debug!("IMG_DIFF: {} [{},{},{}]: {} {}", i, (i/4)%w1, (i/4)/w1, i%4, v1, v2);
            flag = false;
        }
    }
    Ok(flag)
}
