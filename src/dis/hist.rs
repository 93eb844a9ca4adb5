//! Per-channel histogram features for the histogram discriminator.
use anyhow::Result;
use tch::{Kind, Tensor};

/// Turns an image batch `[N, C, H, W]` with values in `[0, 1]` into the
/// flattened per-channel histograms `[N, C * bins]` that [`crate::HisDis`]
/// scores. Values are clamped into range and each channel's histogram is
/// normalized to sum to one.
pub fn channel_histogram(xs: &Tensor, bins: i64) -> Result<Tensor> {
    let (n, c, h, w) = xs.size4()?;
    let idx = (xs.clamp(0.0, 1.0) * bins as f64)
        .floor()
        .clamp(0.0, (bins - 1) as f64)
        .to_kind(Kind::Int64)
        .view([n, c, h * w]);
    let counts = idx
        .one_hot(bins)
        .to_kind(Kind::Float)
        .sum_dim_intlist(&[2i64][..], false, Kind::Float);
    Ok((counts / (h * w) as f64).view([n, c * bins]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use tch::{Device, Kind};

    #[test]
    fn histograms_sum_to_one_per_channel() {
        let xs = Tensor::rand(&[2, 3, 16, 16], (Kind::Float, Device::Cpu));
        let hist = channel_histogram(&xs, 256).unwrap();
        assert_eq!(hist.size(), [2, 3 * 256]);
        let sums = hist.view([2, 3, 256]).sum_dim_intlist(&[2i64][..], false, Kind::Float);
        let ones = sums.ones_like();
        assert!(sums.allclose(&ones, 1e-5, 1e-5, false));
    }

    #[test]
    fn constant_channel_lands_in_a_single_bin() {
        let mut arr: Array3<f32> = ndarray::ArrayBase::zeros((2, 8, 8));
        for x in 0..8 {
            for y in 0..8 {
                arr[[0, x, y]] = 0.0;
                arr[[1, x, y]] = 0.5;
            }
        }
        let xs: Tensor = arr.try_into().unwrap();
        let hist = channel_histogram(&xs.unsqueeze(0), 4).unwrap();
        let hist = hist.view([2, 4]);
        // All mass of channel 0 in bin 0, all of channel 1 in bin 2.
        assert!((hist.double_value(&[0, 0]) - 1.0).abs() < 1e-6);
        assert!((hist.double_value(&[1, 2]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let xs = Tensor::rand(&[1, 1, 8, 8], (Kind::Float, Device::Cpu)) * 4.0 - 2.0;
        let hist = channel_histogram(&xs, 16).unwrap();
        let total = hist.sum(Kind::Float);
        assert!((total.double_value(&[]) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn rejects_non_image_input() {
        let xs = Tensor::rand(&[4, 256], (Kind::Float, Device::Cpu));
        assert!(channel_histogram(&xs, 256).is_err());
    }
}
