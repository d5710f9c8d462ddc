/// Salt mixed into per-position seeds so every payload position gets an
/// independent carrier stream. Also the fallback seed for a zero state.
pub(crate) const SEED_SALT: u64 = 0x9e3779b97f4a7c15;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// A watermark key derived from an opaque secret.
///
/// The secret is hashed once (64-bit FNV-1a) to a base seed; each payload
/// position then derives its own PRNG seed from the base. Both ends of the
/// channel must use the same secret to regenerate identical carriers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SecretKey {
    base_seed: u64,
}

impl SecretKey {
    /// Derive a key from the raw bytes of a secret. The empty secret is
    /// permitted and hashes to the FNV offset basis.
    pub fn from_bytes(secret: &[u8]) -> Self {
        let mut hash = FNV_OFFSET_BASIS;
        for &byte in secret {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        Self { base_seed: hash }
    }

    /// Derive a key from a passphrase string.
    pub fn from_passphrase(passphrase: &str) -> Self {
        Self::from_bytes(passphrase.as_bytes())
    }

    /// The 64-bit base seed.
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// PRNG seed for a payload position: `base XOR (position * SALT)`,
    /// both computed with wrapping arithmetic.
    pub fn seed_for_position(&self, position: usize) -> u64 {
        self.base_seed ^ (position as u64).wrapping_mul(SEED_SALT)
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("base_seed", &"[REDACTED]")
            .finish()
    }
}

/// 64-bit xorshift PRNG with shift triple (13, 7, 17).
///
/// Fast, deterministic, and statistically adequate for spreading sequences.
/// Not cryptographic.
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Seed the generator. A zero seed is replaced with a fixed non-zero
    /// constant, since xorshift has an all-zero fixed point.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { SEED_SALT } else { seed },
        }
    }

    /// Advance the state and return it.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform value in `[0, 1)` from the top 53 bits of the next state.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / 9007199254740992.0)
    }
}
