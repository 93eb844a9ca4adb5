use tch::nn::{ConvConfig, Init, ModuleT};
use tch::{nn, Tensor};

pub mod hist;
pub mod norm;

/// Hyperparameters for [`PatchGan70`].
#[derive(Debug, Clone, Copy)]
pub struct PatchGan70Config {
    /// Stddev of the Gaussian noise added to the input while training.
    pub noise: f64,
    /// Insert instance norm after the inner convolutions. The reference
    /// architecture calls for it; the shipped configuration ran without.
    pub norm: bool,
}

impl Default for PatchGan70Config {
    fn default() -> Self {
        PatchGan70Config {
            noise: 0.25,
            norm: false,
        }
    }
}

/// 70x70 PatchGAN discriminator, see "Unpaired Image-to-Image Translation
/// using Cycle-Consistent Adversarial Networks" Zhu et al. 2018.
///
/// Maps `[N, C, H, W]` images to a `[N, 1, H', W']` map of patch logits,
/// one score per overlapping 70x70 receptive field (`[N, 1, 30, 30]` for
/// 256x256 inputs).
#[derive(Debug)]
pub struct PatchGan70 {
    seq: nn::SequentialT,
    noise: f64,
}

fn conv4x4(p: nn::Path, ni: i64, nf: i64, stride: i64) -> nn::Conv2D {
    // Padding is done by hand with reflection, so the conv itself is valid.
    nn::conv2d(
        p,
        ni,
        nf,
        4,
        ConvConfig {
            stride,
            padding: 0,
            ws_init: Init::Randn { mean: 0.0, stdev: 0.02 },
            bs_init: Init::Const(0.0),
            ..Default::default()
        },
    )
}

impl PatchGan70 {
    pub fn new(p: nn::Path, input_c: i64, cfg: PatchGan70Config) -> Self {
        let ladder = [(input_c, 64, 2), (64, 128, 2), (128, 256, 2), (256, 512, 1)];
        let mut seq = nn::seq_t();
        for (i, (ni, nf, stride)) in ladder.into_iter().enumerate() {
            seq = seq
                .add_fn(|t| t.reflection_pad2d(&[1, 1, 1, 1]))
                .add(conv4x4(&p / &format!("conv_{}", i), ni, nf, stride));
            if cfg.norm && i > 0 {
                seq = seq.add(norm::instance_norm2d(
                    &p / &format!("norm_{}", i),
                    nf,
                    Default::default(),
                ));
            }
            seq = seq.add_fn(|t| t.maximum(&(t * 0.2))); // leaky relu
        }
        // Single-channel logit map, no activation.
        seq = seq
            .add_fn(|t| t.reflection_pad2d(&[1, 1, 1, 1]))
            .add(conv4x4(&p / "conv_4", 512, 1, 1));
        Self {
            seq,
            noise: cfg.noise,
        }
    }
}

impl ModuleT for PatchGan70 {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        let xs = if train && self.noise > 0.0 {
            xs + xs.randn_like() * self.noise
        } else {
            xs.shallow_clone()
        };
        self.seq.forward_t(&xs, train)
    }
}

/// Hyperparameters for [`HisDis`].
#[derive(Debug, Clone, Copy)]
pub struct HisDisConfig {
    /// Stddev of the Gaussian noise added to the input while training.
    pub noise: f64,
    /// Keep probability of the dropout in front of every dense layer.
    pub keep_prob: f64,
}

impl Default for HisDisConfig {
    fn default() -> Self {
        HisDisConfig {
            noise: 0.1,
            keep_prob: 0.5,
        }
    }
}

/// Histogram discriminator: scores flattened per-channel histogram vectors
/// (`[N, bins * channels]`, see [`hist::channel_histogram`]) instead of raw
/// pixels. Two tanh hidden layers of 64 units and a linear scalar head,
/// shifted so an untrained net scores around 0.5.
#[derive(Debug)]
pub struct HisDis {
    seq: nn::SequentialT,
    noise: f64,
}

impl HisDis {
    pub fn new(p: nn::Path, in_dim: i64, cfg: HisDisConfig) -> Self {
        let drop = 1.0 - cfg.keep_prob;
        let seq = nn::seq_t()
            .add_fn_t(move |t, train| t.dropout(drop, train))
            .add(nn::linear(&p / "hidden_1", in_dim, 64, Default::default()))
            .add_fn(|t| t.tanh())
            .add_fn_t(move |t, train| t.dropout(drop, train))
            .add(nn::linear(&p / "hidden_2", 64, 64, Default::default()))
            .add_fn(|t| t.tanh())
            .add_fn_t(move |t, train| t.dropout(drop, train))
            .add(nn::linear(&p / "h_out", 64, 1, Default::default()))
            .add_fn(|t| t + 0.5);
        Self {
            seq,
            noise: cfg.noise,
        }
    }
}

impl ModuleT for HisDis {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        // Histogram mass lives in [0, 1]; recenter it around zero.
        let xs = if train && self.noise > 0.0 {
            xs - 0.5 + xs.randn_like() * self.noise
        } else {
            xs - 0.5
        };
        self.seq.forward_t(&xs, train)
    }
}
