//! Training-side augmentation and evaluation-side noise.

mod augment;
pub mod gaussian;
mod noise;

pub use augment::SyntheticAugmenter;
pub use noise::NoiseInjector;
