use sha2::{Digest, Sha256};

/// Derive a 32-byte seed from arbitrary byte parts.
///
/// Each part is length-prefixed (u32 big-endian) before hashing so that
/// `["ab", "c"]` and `["a", "bc"]` produce different seeds.
pub fn derive_seed(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update((part.len() as u32).to_be_bytes());
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Uniform-ish index in `[0, bound)` for step `step` of the stream.
///
/// `index = uint128(sha256(seed || step_u64_be)[0..16]) % bound`
///
/// The modulo bias over a 128-bit sample is negligible for any realistic
/// pool size. Not suitable for anything that needs unpredictability.
pub fn index_below(seed: &[u8; 32], step: u64, bound: u64) -> u64 {
    if bound <= 1 {
        return 0;
    }
    let mut hasher = Sha256::new();
    hasher.update(seed);
    hasher.update(step.to_be_bytes());
    let digest: [u8; 32] = hasher.finalize().into();

    let mut head = [0u8; 16];
    head.copy_from_slice(&digest[0..16]);
    (u128::from_be_bytes(head) % bound as u128) as u64
}

/// Unweighted Fisher–Yates shuffle driven by the seeded hash stream.
pub fn shuffle<T>(items: &mut [T], seed: &[u8; 32]) {
    let len = items.len();
    if len < 2 {
        return;
    }
    for i in (1..len).rev() {
        let j = index_below(seed, i as u64, i as u64 + 1) as usize;
        items.swap(i, j);
    }
}
