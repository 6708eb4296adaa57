//! Grayscale preprocessing and named presets
//!
//! Turns a normalized grayscale image into the speed field the solver
//! propagates over. The filter chain is fixed: Gaussian blur, contrast about
//! the mean, additive brightness with clamping, then an optional power-law
//! gamma correction. Bright regions become fast regions, so the wavefront
//! races through highlights and lingers in shadows, which is what bunches
//! the contour lines in dark areas of the drawing.
//!
//! Presets are a fixed enumerated table, not mutable configuration: each
//! names the full filter parameter set it stands for.

use serde::Serialize;
use tracing::debug;

use crate::field::{ScalarField, SpeedField};

/// Named preprocessing preset
///
/// Six fixed configurations trading contour density against smoothness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Preset {
    /// Baseline settings
    A,
    /// More contrast, less bright
    B,
    /// Less contrast, brighter
    C,
    /// With gamma darkening
    D,
    /// More blur, less contrast
    E,
    /// Less blur, subtle processing
    F,
}

/// Filter parameters for one preset
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PresetConfig {
    /// Gaussian sigma as a fraction of the smaller image dimension
    pub blur: f32,
    /// Multiplicative deviation-from-mean scale
    pub contrast: f32,
    /// Additive offset applied after contrast, result clamped to [0, 1]
    pub brightness: f32,
    /// Power-law correction exponent; 1.0 disables the gamma step
    pub gamma: f32,
    /// Human-readable summary
    pub desc: &'static str,
}

impl Preset {
    /// All presets in declaration order
    pub const ALL: [Preset; 6] = [
        Preset::A,
        Preset::B,
        Preset::C,
        Preset::D,
        Preset::E,
        Preset::F,
    ];

    /// Filter parameters for this preset
    #[must_use]
    pub const fn config(self) -> PresetConfig {
        match self {
            Preset::A => PresetConfig {
                blur: 0.00275,
                contrast: 0.85,
                brightness: 0.10,
                gamma: 1.0,
                desc: "Baseline settings",
            },
            Preset::B => PresetConfig {
                blur: 0.00275,
                contrast: 0.95,
                brightness: 0.05,
                gamma: 1.0,
                desc: "More contrast, less bright",
            },
            Preset::C => PresetConfig {
                blur: 0.00275,
                contrast: 0.75,
                brightness: 0.15,
                gamma: 1.0,
                desc: "Less contrast, brighter",
            },
            Preset::D => PresetConfig {
                blur: 0.00275,
                contrast: 0.85,
                brightness: 0.10,
                gamma: 0.85,
                desc: "With gamma darkening",
            },
            Preset::E => PresetConfig {
                blur: 0.00400,
                contrast: 0.80,
                brightness: 0.10,
                gamma: 1.0,
                desc: "More blur, less contrast",
            },
            Preset::F => PresetConfig {
                blur: 0.00200,
                contrast: 0.90,
                brightness: 0.05,
                gamma: 1.0,
                desc: "Less blur, subtle processing",
            },
        }
    }

    /// Single-letter preset name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Preset::A => "A",
            Preset::B => "B",
            Preset::C => "C",
            Preset::D => "D",
            Preset::E => "E",
            Preset::F => "F",
        }
    }

    /// Look up a preset by its single-letter name (case-insensitive)
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "A" => Some(Preset::A),
            "B" => Some(Preset::B),
            "C" => Some(Preset::C),
            "D" => Some(Preset::D),
            "E" => Some(Preset::E),
            "F" => Some(Preset::F),
            _ => None,
        }
    }
}

/// Apply the preprocessing chain and produce the speed field
///
/// Steps, in order:
/// 1. Gaussian blur with `sigma = blur * min(H, W)`
/// 2. Contrast about the mean: `v = mean + (v - mean) * contrast`
/// 3. Brightness: `v = clamp(v + brightness, 0, 1)`
/// 4. Gamma (when `gamma != 1.0`): `v = v.powf(1 / gamma)`
///
/// The result is clamped into the valid speed range by
/// [`SpeedField::from_brightness`].
#[must_use]
pub fn preprocess(gray: &ScalarField, config: &PresetConfig) -> SpeedField {
    let sigma = config.blur * gray.width().min(gray.height()) as f32;
    debug!(
        "Preprocess: sigma {}, contrast {}, brightness {}, gamma {}",
        sigma, config.contrast, config.brightness, config.gamma
    );

    let mut field = gaussian_blur(gray, sigma);

    let mean = field.mean();
    for v in field.as_mut_slice() {
        *v = mean + (*v - mean) * config.contrast;
        *v = (*v + config.brightness).clamp(0.0, 1.0);
    }

    if (config.gamma - 1.0).abs() > f32::EPSILON {
        let exponent = 1.0 / config.gamma;
        for v in field.as_mut_slice() {
            *v = v.clamp(0.0, 1.0).powf(exponent);
        }
    }

    SpeedField::from_brightness(field)
}

/// Separable Gaussian blur with edge-clamped sampling
///
/// The kernel is truncated at 4σ and normalized. A sigma too small to
/// produce a nontrivial kernel returns the input unchanged.
#[must_use]
pub fn gaussian_blur(field: &ScalarField, sigma: f32) -> ScalarField {
    let radius = (4.0 * sigma).ceil() as usize;
    if sigma <= 0.0 || radius == 0 || field.is_empty() {
        return field.clone();
    }
    let kernel = gaussian_kernel(sigma, radius);

    let horizontal = convolve_rows(field, &kernel);
    // Vertical pass reuses the row convolution on the transpose
    let transposed = transpose(&horizontal);
    let blurred = convolve_rows(&transposed, &kernel);
    transpose(&blurred)
}

/// Normalized 1D Gaussian kernel of half-width `radius`
fn gaussian_kernel(sigma: f32, radius: usize) -> Vec<f32> {
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..=2 * radius)
        .map(|i| {
            let d = i as f32 - radius as f32;
            (-d * d / denom).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

/// Convolve every row with `kernel`, clamping samples at the row ends
fn convolve_rows(field: &ScalarField, kernel: &[f32]) -> ScalarField {
    let width = field.width();
    let height = field.height();
    let radius = kernel.len() / 2;
    let mut out = ScalarField::with_value(width, height, 0.0);

    for row in 0..height {
        for col in 0..width {
            let mut acc = 0.0;
            for (k, &w) in kernel.iter().enumerate() {
                let sample = (col + k).saturating_sub(radius).min(width - 1);
                acc += w * field.get(row, sample);
            }
            out.set(row, col, acc);
        }
    }
    out
}

/// Swap rows and columns
fn transpose(field: &ScalarField) -> ScalarField {
    let mut out = ScalarField::with_value(field.height(), field.width(), 0.0);
    for row in 0..field.height() {
        for col in 0..field.width() {
            out.set(col, row, field.get(row, col));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_preset_table_matches_fixed_configuration() {
        let a = Preset::A.config();
        assert_eq!(a.blur, 0.00275);
        assert_eq!(a.contrast, 0.85);
        assert_eq!(a.brightness, 0.10);
        assert_eq!(a.gamma, 1.0);

        let d = Preset::D.config();
        assert_eq!(d.gamma, 0.85);
        let e = Preset::E.config();
        assert_eq!(e.blur, 0.00400);
        let f = Preset::F.config();
        assert_eq!(f.blur, 0.00200);
        assert_eq!(f.contrast, 0.90);
    }

    #[test]
    fn test_preset_lookup_by_name() {
        for preset in Preset::ALL {
            assert_eq!(Preset::from_name(preset.name()), Some(preset));
        }
        assert_eq!(Preset::from_name("b"), Some(Preset::B));
        assert_eq!(Preset::from_name("G"), None);
        assert_eq!(Preset::from_name(""), None);
    }

    #[test]
    fn test_gaussian_kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel(1.5, 6);
        assert_eq!(kernel.len(), 13);
        let sum: f32 = kernel.iter().sum();
        assert_relative_eq!(sum, 1.0, max_relative = 1e-5);
        for i in 0..6 {
            assert_relative_eq!(kernel[i], kernel[12 - i], max_relative = 1e-5);
        }
        // Peak at the center
        assert!(kernel[6] > kernel[5]);
    }

    #[test]
    fn test_blur_preserves_constant_field() {
        let field = ScalarField::with_value(16, 12, 0.7);
        let blurred = gaussian_blur(&field, 2.0);
        for &v in blurred.as_slice() {
            assert_relative_eq!(v, 0.7, max_relative = 1e-4);
        }
    }

    #[test]
    fn test_blur_smooths_an_impulse() {
        let mut field = ScalarField::with_value(15, 15, 0.0);
        field.set(7, 7, 1.0);
        let blurred = gaussian_blur(&field, 1.0);
        let center = blurred.get(7, 7);
        assert!(center < 1.0, "peak must spread out");
        assert!(center > blurred.get(7, 8), "center stays the maximum");
        assert!(blurred.get(7, 8) > blurred.get(7, 9), "mass decays outward");
        // Total mass is preserved by the normalized kernel
        let sum: f32 = blurred.as_slice().iter().sum();
        assert_relative_eq!(sum, 1.0, max_relative = 1e-3);
    }

    #[test]
    fn test_tiny_sigma_is_identity() {
        let field = ScalarField::from_data(2, 2, vec![0.1, 0.9, 0.4, 0.6]);
        let blurred = gaussian_blur(&field, 0.0);
        assert_eq!(blurred, field);
    }

    #[test]
    fn test_contrast_pivots_on_mean() {
        // Uniform field: contrast and blur are no-ops, brightness shifts
        let gray = ScalarField::with_value(8, 8, 0.5);
        let config = PresetConfig {
            blur: 0.0,
            contrast: 0.85,
            brightness: 0.10,
            gamma: 1.0,
            desc: "",
        };
        let speed = preprocess(&gray, &config);
        assert_relative_eq!(speed.get(4, 4), 0.6, max_relative = 1e-5);
    }

    #[test]
    fn test_contrast_compresses_toward_mean() {
        let gray = ScalarField::from_data(2, 1, vec![0.0, 1.0]);
        let config = PresetConfig {
            blur: 0.0,
            contrast: 0.5,
            brightness: 0.0,
            gamma: 1.0,
            desc: "",
        };
        let speed = preprocess(&gray, &config);
        // Mean 0.5, halved deviations: 0.25 and 0.75
        assert_relative_eq!(speed.get(0, 0), 0.25, max_relative = 1e-5);
        assert_relative_eq!(speed.get(0, 1), 0.75, max_relative = 1e-5);
    }

    #[test]
    fn test_gamma_darkens_midtones() {
        let gray = ScalarField::with_value(4, 4, 0.5);
        let config = PresetConfig {
            blur: 0.0,
            contrast: 1.0,
            brightness: 0.0,
            gamma: 0.85,
            desc: "",
        };
        let speed = preprocess(&gray, &config);
        // 0.5^(1/0.85) < 0.5
        let expected = 0.5_f32.powf(1.0 / 0.85);
        assert_relative_eq!(speed.get(0, 0), expected, max_relative = 1e-5);
        assert!(speed.get(0, 0) < 0.5);
    }

    #[test]
    fn test_output_is_valid_speed_range() {
        // Extreme inputs must still land in (0, 1]
        let gray = ScalarField::from_data(3, 1, vec![-0.5, 0.0, 2.0]);
        let speed = preprocess(&gray, &Preset::B.config());
        for row in 0..1 {
            for col in 0..3 {
                let v = speed.get(row, col);
                assert!(v > 0.0 && v <= 1.0, "speed {v} out of range");
            }
        }
    }
}
