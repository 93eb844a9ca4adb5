//! A 2D instance-normalization layer.
//!
//! `tch` exposes the `Tensor::instance_norm` primitive but no `nn` layer
//! for it, so the PatchGAN ladder brings its own.
use std::borrow::Borrow;
use tch::nn;
use tch::nn::{Init, ModuleT};
use tch::Tensor;

/// Instance-normalization config.
#[derive(Debug, Clone, Copy)]
pub struct InstanceNormConfig {
    pub cudnn_enabled: bool,
    pub eps: f64,
    pub momentum: f64,
    pub affine: bool,
    pub ws_init: Init,
    pub bs_init: Init,
}

impl Default for InstanceNormConfig {
    fn default() -> Self {
        InstanceNormConfig {
            cudnn_enabled: true,
            eps: 1e-5,
            momentum: 0.1,
            affine: true,
            ws_init: Init::Randn { mean: 1.0, stdev: 0.02 },
            bs_init: Init::Const(0.0),
        }
    }
}

/// A 2D instance-normalization layer.
///
/// The input shape is assumed to be (N, C, H, W). Each channel of each
/// sample is normalized with its own spatial statistics; no running
/// statistics are tracked.
#[derive(Debug)]
pub struct InstanceNorm2D {
    config: InstanceNormConfig,
    pub ws: Option<Tensor>,
    pub bs: Option<Tensor>,
}

pub fn instance_norm2d<'a, T: Borrow<nn::Path<'a>>>(
    vs: T,
    out_dim: i64,
    config: InstanceNormConfig,
) -> InstanceNorm2D {
    let vs = vs.borrow();
    let (ws, bs) = if config.affine {
        let ws = vs.var("weight", &[out_dim], config.ws_init);
        let bs = vs.var("bias", &[out_dim], config.bs_init);
        (Some(ws), Some(bs))
    } else {
        (None, None)
    };
    InstanceNorm2D { config, ws, bs }
}

impl ModuleT for InstanceNorm2D {
    fn forward_t(&self, xs: &Tensor, _train: bool) -> Tensor {
        let dim = xs.dim();
        if dim != 4 {
            panic!(
                "expected an input tensor with 4 dims, got {} ({:?})",
                dim,
                xs.size()
            )
        }
        Tensor::instance_norm(
            xs,
            self.ws.as_ref(),
            self.bs.as_ref(),
            None,
            None,
            true,
            self.config.momentum,
            self.config.eps,
            self.config.cudnn_enabled,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::{nn, Device, Kind};

    #[test]
    fn normalizes_per_channel_statistics() {
        let vs = nn::VarStore::new(Device::Cpu);
        let root = vs.root();
        let cfg = InstanceNormConfig {
            affine: false,
            ..Default::default()
        };
        let norm = instance_norm2d(&root / "in", 2, cfg);
        let xs = Tensor::rand(&[3, 2, 16, 16], (Kind::Float, Device::Cpu)) * 5.0 + 7.0;
        let out = norm.forward_t(&xs, true);
        let mean = out.mean_dim(&[2i64, 3][..], false, Kind::Float);
        let zeros = mean.zeros_like();
        assert!(mean.allclose(&zeros, 1e-4, 1e-4, false));
    }
}
