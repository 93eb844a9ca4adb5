//! Discriminator networks for a histogram-aware image-to-image
//! translation GAN.
//!
//! Two discriminators are provided: a 70x70 PatchGAN over image tensors
//! (Zhu et al. 2018) and a small dense network over flattened per-channel
//! histogram vectors. Both are plain graph builders on top of `tch`: the
//! caller owns the `nn::VarStore`, builds a discriminator under a path of
//! its choosing and drives it through `nn::ModuleT`. Training, losses and
//! checkpointing live outside this crate.

pub mod dis;

pub use dis::{HisDis, HisDisConfig, PatchGan70, PatchGan70Config};
