//! Structural similarity (SSIM) between two greyscale images.
//!
//! Local statistics come from a square uniform window. Only window positions
//! that lie fully inside the image contribute to the mean index, so no border
//! padding is needed.

use crate::error::CompareError;
use image::DynamicImage;
use ndarray::{Array2, ArrayView2, Zip};

/// Parameters of the SSIM computation
#[derive(Debug, Clone, PartialEq)]
pub struct SsimConfig {
    /// Side of the square window (odd)
    pub window: usize,
    /// Luminance stabilizer coefficient
    pub k1: f64,
    /// Contrast stabilizer coefficient
    pub k2: f64,
    /// Dynamic range for the stabilizers; defaults to 2.0, the `[-1, 1]`
    /// span of a float image
    pub data_range: f64,
    /// Normalize variances by `NP - 1` instead of `NP`
    pub sample_covariance: bool,
}

impl Default for SsimConfig {
    fn default() -> Self {
        Self {
            window: 7,
            k1: 0.01,
            k2: 0.03,
            data_range: 2.0,
            sample_covariance: true,
        }
    }
}

/// Greyscale pixels as floats in `[0, 1]`, indexed `[row, column]`
pub fn to_gray_array(image: &DynamicImage) -> Array2<f64> {
    let gray = image.to_luma32f();
    let (width, height) = gray.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
        gray.get_pixel(x as u32, y as u32)[0] as f64
    })
}

/// Mean SSIM of two equally sized greyscale arrays.
///
/// 1.0 means identical. The index can dip below zero for anti-correlated
/// images; it is returned unclamped.
pub fn structural_similarity(
    a: ArrayView2<'_, f64>,
    b: ArrayView2<'_, f64>,
    config: &SsimConfig,
) -> Result<f64, CompareError> {
    let (rows, cols) = a.dim();
    let (b_rows, b_cols) = b.dim();
    if (rows, cols) != (b_rows, b_cols) {
        return Err(CompareError::DimensionMismatch {
            left_width: cols as u32,
            left_height: rows as u32,
            right_width: b_cols as u32,
            right_height: b_rows as u32,
        });
    }

    let win = config.window;
    if rows < win || cols < win {
        return Err(CompareError::ImageTooSmall {
            width: cols as u32,
            height: rows as u32,
            window: win,
        });
    }

    let np = (win * win) as f64;
    let cov_norm = if config.sample_covariance {
        np / (np - 1.0)
    } else {
        1.0
    };

    let ux = window_means(&a.to_owned(), win);
    let uy = window_means(&b.to_owned(), win);
    let uxx = window_means(&(&a * &a), win);
    let uyy = window_means(&(&b * &b), win);
    let uxy = window_means(&(&a * &b), win);

    let c1 = (config.k1 * config.data_range).powi(2);
    let c2 = (config.k2 * config.data_range).powi(2);

    let mut total = 0.0;
    Zip::from(&ux)
        .and(&uy)
        .and(&uxx)
        .and(&uyy)
        .and(&uxy)
        .for_each(|&mx, &my, &mxx, &myy, &mxy| {
            let vx = cov_norm * (mxx - mx * mx);
            let vy = cov_norm * (myy - my * my);
            let vxy = cov_norm * (mxy - mx * my);

            let numerator = (2.0 * mx * my + c1) * (2.0 * vxy + c2);
            let denominator = (mx * mx + my * my + c1) * (vx + vy + c2);
            total += numerator / denominator;
        });

    Ok(total / ux.len() as f64)
}

/// Mean of every full `win` x `win` window, via a summed-area table
fn window_means(values: &Array2<f64>, win: usize) -> Array2<f64> {
    let (rows, cols) = values.dim();

    let mut table = Array2::<f64>::zeros((rows + 1, cols + 1));
    for y in 0..rows {
        let mut row_sum = 0.0;
        for x in 0..cols {
            row_sum += values[[y, x]];
            table[[y + 1, x + 1]] = table[[y, x + 1]] + row_sum;
        }
    }

    let area = (win * win) as f64;
    let out_rows = rows - win + 1;
    let out_cols = cols - win + 1;
    Array2::from_shape_fn((out_rows, out_cols), |(y, x)| {
        let sum = table[[y + win, x + win]] - table[[y, x + win]] - table[[y + win, x]]
            + table[[y, x]];
        sum / area
    })
}
