use rand::{rngs::StdRng, SeedableRng};

pub fn seed_from_label(label: &str) -> [u8; 32] {
    blake3::hash(label.as_bytes()).into()
}

pub fn seed_from_u64(value: u64) -> [u8; 32] {
    seed_from_label(&value.to_string())
}

pub fn rng_from_seed(seed: &[u8; 32]) -> StdRng {
    StdRng::from_seed(*seed)
}
