#![allow(dead_code)]

use tensorlib::{ActivationFunction, Network, NetworkSpec};

/// Deterministic generator independent of `rand`'s output stream, drawing
/// from `[low, high)` with a 64-bit LCG.
pub fn lcg(seed: u64, low: f32, high: f32) -> impl FnMut(usize, usize) -> f32 {
    let mut state = seed;
    move |_, _| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let unit = (state >> 40) as f32 / (1u32 << 24) as f32;
        low + (high - low) * unit
    }
}

pub fn xor_network(seed: u64, low: f32, high: f32, activation: ActivationFunction) -> Network {
    let spec = NetworkSpec::new(vec![2, 2, 1], activation);
    Network::from_fn(&spec, lcg(seed, low, high)).unwrap()
}
