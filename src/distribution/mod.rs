//! Random size generation
//!
//! Workers draw the size of every scratch buffer from a [`size::SizeSampler`].
//! Samplers hold no generator of their own: the worker passes its private
//! generator in, so a single seeded stream drives the whole iteration.
//!
//! # Example
//!
//! ```
//! use mempulse::distribution::size::SizeSampler;
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256PlusPlus;
//!
//! let sampler = SizeSampler::new(1024, 4096);
//! let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
//! let size = sampler.sample(&mut rng);
//! assert!((1024..=4096).contains(&size));
//! ```

pub mod size;

pub use size::SizeSampler;
