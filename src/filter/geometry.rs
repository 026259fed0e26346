use rayon::prelude::*;

use crate::foundation::{
    core::{Affine, FrameRgba, Point, byte_len},
    error::{SceneforgeError, SceneforgeResult},
};

/// Rotate a raster about its own center, then scale it uniformly.
///
/// The output raster is the rotated/scaled bounding size; nothing is
/// cropped, and samples falling outside the source are transparent.
/// Rotation 0 with scale 100 is a byte-exact no-op.
pub fn rotate_scale(src: &FrameRgba, degrees: f32, scale_pct: f32) -> SceneforgeResult<FrameRgba> {
    if degrees == 0.0 && scale_pct == 100.0 {
        return Ok(src.clone());
    }

    let scale = f64::from(scale_pct) / 100.0;
    let rad = f64::from(degrees).to_radians();
    let (w, h) = (f64::from(src.width), f64::from(src.height));
    let (abs_cos, abs_sin) = (rad.cos().abs(), rad.sin().abs());
    let out_w = ((w * abs_cos + h * abs_sin) * scale).ceil().max(1.0) as u32;
    let out_h = ((w * abs_sin + h * abs_cos) * scale).ceil().max(1.0) as u32;
    byte_len(out_w, out_h)?;

    let forward = Affine::translate((f64::from(out_w) / 2.0, f64::from(out_h) / 2.0))
        * Affine::rotate(rad)
        * Affine::scale(scale)
        * Affine::translate((-w / 2.0, -h / 2.0));
    let inverse = forward.inverse();

    let mut out = FrameRgba::filled(out_w, out_h, [0, 0, 0, 0])?;
    let stride = (out_w as usize) * 4;
    out.data
        .par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..out_w as usize {
                let p = inverse * Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let px = bilinear(src, p.x, p.y, false);
                row[x * 4..x * 4 + 4].copy_from_slice(&px);
            }
        });
    Ok(out)
}

/// Resample a raster to a new size with clamp-to-edge bilinear sampling.
/// Same-size requests are a byte-exact no-op.
pub fn resize_bilinear(src: &FrameRgba, new_w: u32, new_h: u32) -> SceneforgeResult<FrameRgba> {
    if new_w == 0 || new_h == 0 {
        return Err(SceneforgeError::validation(
            "resize target must be non-zero",
        ));
    }
    if new_w == src.width && new_h == src.height {
        return Ok(src.clone());
    }
    byte_len(new_w, new_h)?;

    let sx = f64::from(src.width) / f64::from(new_w);
    let sy = f64::from(src.height) / f64::from(new_h);

    let mut out = FrameRgba::filled(new_w, new_h, [0, 0, 0, 0])?;
    let stride = (out.width as usize) * 4;
    let out_w = out.width;
    out.data
        .par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..out_w as usize {
                let px = bilinear(
                    src,
                    (x as f64 + 0.5) * sx,
                    (y as f64 + 0.5) * sy,
                    true,
                );
                row[x * 4..x * 4 + 4].copy_from_slice(&px);
            }
        });
    Ok(out)
}

/// Bilinear sample at a continuous coordinate (pixel centers at i + 0.5).
/// `clamp_edges` selects clamp-to-edge vs transparent-outside behavior.
fn bilinear(src: &FrameRgba, x: f64, y: f64, clamp_edges: bool) -> [u8; 4] {
    let fx = x - 0.5;
    let fy = y - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let mut acc = [0.0f64; 4];
    for (dy, wy) in [(0i64, 1.0 - ty), (1, ty)] {
        for (dx, wx) in [(0i64, 1.0 - tx), (1, tx)] {
            let weight = wx * wy;
            if weight == 0.0 {
                continue;
            }
            let px = fetch(src, x0 + dx, y0 + dy, clamp_edges);
            for c in 0..4 {
                acc[c] += weight * f64::from(px[c]);
            }
        }
    }

    let mut out = [0u8; 4];
    for c in 0..4 {
        out[c] = acc[c].round().clamp(0.0, 255.0) as u8;
    }
    out
}

fn fetch(src: &FrameRgba, x: i64, y: i64, clamp_edges: bool) -> [u8; 4] {
    let (w, h) = (i64::from(src.width), i64::from(src.height));
    let (x, y) = if clamp_edges {
        (x.clamp(0, w - 1), y.clamp(0, h - 1))
    } else if x < 0 || y < 0 || x >= w || y >= h {
        return [0, 0, 0, 0];
    } else {
        (x, y)
    };
    src.pixel(x as u32, y as u32)
}
