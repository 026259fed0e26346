use crate::{
    filter::{blur, geometry},
    foundation::core::FrameRgba,
    foundation::error::SceneforgeResult,
    scene::model::FilterParams,
};

/// Apply the full filter chain to a raster.
///
/// The pass order is part of the contract (geometry, brightness,
/// contrast, grayscale mix, saturation, blur) because the tonal passes do
/// not commute. Each pass skips entirely at its identity parameter, so
/// all-default parameters return the input byte-for-byte.
#[tracing::instrument(skip(src, params), fields(w = src.width, h = src.height))]
pub fn apply(src: &FrameRgba, params: &FilterParams) -> SceneforgeResult<FrameRgba> {
    params.validate()?;

    let mut out = geometry::rotate_scale(src, params.rotation, params.scale)?;
    if params.brightness != 100.0 {
        brightness_pass(&mut out, params.brightness);
    }
    if params.contrast != 100.0 {
        contrast_pass(&mut out, params.contrast);
    }
    if params.grayscale != 0.0 {
        grayscale_pass(&mut out, params.grayscale);
    }
    if params.saturation != 100.0 {
        saturation_pass(&mut out, params.saturation);
    }
    let radius = params.blur.round() as u32;
    if radius > 0 {
        out = blur::gaussian_blur(&out, radius, radius as f32 / 2.0)?;
    }
    Ok(out)
}

/// `c' = clamp(c * brightness/100)`, alpha untouched.
fn brightness_pass(frame: &mut FrameRgba, brightness: f32) {
    let k = brightness / 100.0;
    for px in frame.data.chunks_exact_mut(4) {
        for c in &mut px[..3] {
            *c = clamp_channel(f32::from(*c) * k);
        }
    }
}

/// `c' = clamp((c - 128) * contrast/100 + 128)`, alpha untouched.
fn contrast_pass(frame: &mut FrameRgba, contrast: f32) {
    let k = contrast / 100.0;
    for px in frame.data.chunks_exact_mut(4) {
        for c in &mut px[..3] {
            *c = clamp_channel((f32::from(*c) - 128.0) * k + 128.0);
        }
    }
}

/// Mix each pixel toward its luma: `c' = c*(1-g) + gray*g` with
/// `gray = 0.299R + 0.587G + 0.114B`. Callers skip `g == 0` so pixel
/// data is never touched at the identity setting.
fn grayscale_pass(frame: &mut FrameRgba, grayscale: f32) {
    let g = grayscale / 100.0;
    for px in frame.data.chunks_exact_mut(4) {
        let (r, gr, b) = (
            f32::from(px[0]),
            f32::from(px[1]),
            f32::from(px[2]),
        );
        let gray = 0.299 * r + 0.587 * gr + 0.114 * b;
        px[0] = clamp_channel(r * (1.0 - g) + gray * g);
        px[1] = clamp_channel(gr * (1.0 - g) + gray * g);
        px[2] = clamp_channel(b * (1.0 - g) + gray * g);
    }
}

/// `c' = avg + (c - avg) * saturation/100` with `avg = (R+G+B)/3`.
fn saturation_pass(frame: &mut FrameRgba, saturation: f32) {
    let k = saturation / 100.0;
    for px in frame.data.chunks_exact_mut(4) {
        let (r, g, b) = (
            f32::from(px[0]),
            f32::from(px[1]),
            f32::from(px[2]),
        );
        let avg = (r + g + b) / 3.0;
        px[0] = clamp_channel(avg + (r - avg) * k);
        px[1] = clamp_channel(avg + (g - avg) * k);
        px[2] = clamp_channel(avg + (b - avg) * k);
    }
}

fn clamp_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::model::FilterField;

    fn single_pixel(rgba: [u8; 4]) -> FrameRgba {
        FrameRgba::filled(1, 1, rgba).unwrap()
    }

    fn with(field: FilterField, value: f32) -> FilterParams {
        let mut params = FilterParams::default();
        params.set(field, value).unwrap();
        params
    }

    #[test]
    fn all_defaults_return_the_input_byte_for_byte() {
        let src = single_pixel([13, 77, 201, 137]);
        let out = apply(&src, &FilterParams::default()).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn brightness_follows_the_documented_formula() {
        let out = apply(&single_pixel([100, 50, 25, 255]), &with(FilterField::Brightness, 150.0))
            .unwrap();
        assert_eq!(out.pixel(0, 0), [150, 75, 38, 255]);

        // Clamps at the channel ceiling.
        let out =
            apply(&single_pixel([200, 0, 0, 255]), &with(FilterField::Brightness, 200.0)).unwrap();
        assert_eq!(out.pixel(0, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn contrast_pivots_around_128() {
        let out =
            apply(&single_pixel([128, 78, 178, 9]), &with(FilterField::Contrast, 200.0)).unwrap();
        assert_eq!(out.pixel(0, 0), [128, 28, 228, 9]);
    }

    #[test]
    fn grayscale_full_mix_equalizes_channels() {
        let out =
            apply(&single_pixel([255, 0, 0, 255]), &with(FilterField::Grayscale, 100.0)).unwrap();
        let [r, g, b, a] = out.pixel(0, 0);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 255);
        assert_eq!(r, 76); // 0.299 * 255
    }

    #[test]
    fn saturation_zero_collapses_to_the_channel_average() {
        let out =
            apply(&single_pixel([30, 60, 90, 255]), &with(FilterField::Saturation, 0.0)).unwrap();
        assert_eq!(out.pixel(0, 0), [60, 60, 60, 255]);
    }

    #[test]
    fn applying_twice_is_byte_identical() {
        let mut src = FrameRgba::filled(8, 6, [0, 0, 0, 255]).unwrap();
        for y in 0..6 {
            for x in 0..8 {
                src.put_pixel(x, y, [(x * 31) as u8, (y * 47) as u8, 128, 255]);
            }
        }
        let mut params = FilterParams::default();
        params.set(FilterField::Brightness, 130.0).unwrap();
        params.set(FilterField::Grayscale, 40.0).unwrap();
        params.set(FilterField::Rotation, 30.0).unwrap();
        params.set(FilterField::Blur, 2.0).unwrap();

        let a = apply(&src, &params).unwrap();
        let b = apply(&src, &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn brightness_and_contrast_do_not_commute() {
        let src = single_pixel([200, 200, 200, 255]);

        let bright_then_contrast = {
            let half = apply(&src, &with(FilterField::Brightness, 50.0)).unwrap();
            apply(&half, &with(FilterField::Contrast, 200.0)).unwrap()
        };
        let contrast_then_bright = {
            let doubled = apply(&src, &with(FilterField::Contrast, 200.0)).unwrap();
            apply(&doubled, &with(FilterField::Brightness, 50.0)).unwrap()
        };

        // (200*0.5 - 128)*2 + 128 = 72 vs ((200-128)*2 + 128 -> 255)*0.5 = 128
        assert_eq!(bright_then_contrast.pixel(0, 0), [72, 72, 72, 255]);
        assert_eq!(contrast_then_bright.pixel(0, 0), [128, 128, 128, 255]);
    }

    #[test]
    fn alpha_passes_through_tonal_passes() {
        let src = single_pixel([10, 20, 30, 99]);
        let mut params = FilterParams::default();
        params.set(FilterField::Brightness, 180.0).unwrap();
        params.set(FilterField::Saturation, 20.0).unwrap();
        let out = apply(&src, &params).unwrap();
        assert_eq!(out.pixel(0, 0)[3], 99);
    }
}
