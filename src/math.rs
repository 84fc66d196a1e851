//! Fixed point color arithmetic

/// Interpolate a value between two end points using fixed point math
///
/// Returns `p + (q - p) * a / 255`, rounded
///
///     use scanfill::lerp_u8;
///     assert_eq!(lerp_u8(0, 255, 255), 255);
///     assert_eq!(lerp_u8(0, 255, 0), 0);
///     assert_eq!(lerp_u8(255, 0, 128), 127);
///
pub fn lerp_u8(p: u8, q: u8, a: u8) -> u8 {
    let base_shift = 8;
    let base_msb = 1 << (base_shift - 1);
    let v = if p > q { 1 } else { 0 };
    let (q,p,a) = (i32::from(q), i32::from(p), i32::from(a));
    let t0 : i32  = (q - p) * a + base_msb - v; // Signed multiplication
    let t1 : i32 = ((t0>>base_shift) + t0) >> base_shift;
    (p + t1) as u8
}

/// Interpolate a premultiplied value, `p + q - p * a`
pub fn prelerp_u8(p: u8, q: u8, a: u8) -> u8 {
    p.wrapping_add(q).wrapping_sub(multiply_u8(p,a))
}

/// Multiply two u8 values using fixed point math
///
/// Returns `a * b / 255`, rounded
///
///     use scanfill::multiply_u8;
///     assert_eq!(multiply_u8(255, 255), 255);
///     assert_eq!(multiply_u8(255, 128), 128);
///     assert_eq!(multiply_u8(0, 200), 0);
///
pub fn multiply_u8(a: u8, b: u8) -> u8 {
    let base_shift = 8;
    let base_msb = 1 << (base_shift - 1);
    let (a,b) = (u32::from(a), u32::from(b));
    let t : u32  = a * b + base_msb;
    let tt : u32 = ((t >> base_shift) + t) >> base_shift;
    tt as u8
}

/// Convert a coverage value in [0,1] to [0,255]
///
/// Without antialiasing coverage of at least 0.5 is full, anything less
/// is none
pub fn cover_u8(cover: f32, antialiasing: bool) -> u8 {
    if ! antialiasing {
        return if cover >= 0.5 { 255 } else { 0 };
    }
    if ! (cover > 0.0) {
        0
    } else if cover >= 1.0 {
        255
    } else {
        (cover * 255.0).round() as u8
    }
}
