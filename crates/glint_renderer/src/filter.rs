//! 3×3 post filters on 8-bit RGB buffers.
//!
//! Both filters leave the one-pixel image border untouched.

/// Replace every interior channel value by the median of its 3×3 neighborhood.
pub fn median_filter(pixels: &[u8], width: u32, height: u32) -> Vec<u8> {
    let mut out = pixels.to_vec();
    let (w, h) = (width as usize, height as usize);
    if w < 3 || h < 3 {
        return out;
    }

    let mut window = [0u8; 9];
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            for c in 0..3 {
                let mut k = 0;
                for ny in y - 1..=y + 1 {
                    for nx in x - 1..=x + 1 {
                        window[k] = pixels[(ny * w + nx) * 3 + c];
                        k += 1;
                    }
                }
                window.sort_unstable();
                out[(y * w + x) * 3 + c] = window[4];
            }
        }
    }

    out
}

/// Binomial 3×3 blur (1 2 1 / 2 4 2 / 1 2 1, normalized).
pub fn gaussian_blur(pixels: &[u8], width: u32, height: u32) -> Vec<u8> {
    const KERNEL: [[u32; 3]; 3] = [[1, 2, 1], [2, 4, 2], [1, 2, 1]];

    let mut out = pixels.to_vec();
    let (w, h) = (width as usize, height as usize);
    if w < 3 || h < 3 {
        return out;
    }

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            for c in 0..3 {
                let mut sum = 0;
                for (ky, row) in KERNEL.iter().enumerate() {
                    for (kx, weight) in row.iter().enumerate() {
                        let idx = ((y + ky - 1) * w + (x + kx - 1)) * 3 + c;
                        sum += pixels[idx] as u32 * weight;
                    }
                }
                out[(y * w + x) * 3 + c] = (sum / 16) as u8;
            }
        }
    }

    out
}
