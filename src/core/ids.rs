//! Record ids drawn from the caller's RNG, so a seeded engine mints the
//! same ids on every run.

use rand::Rng;
use uuid::Builder;

/// A version 4 UUID string built from sixteen bytes of `rng`.
pub fn random_id(rng: &mut impl Rng) -> String {
    Builder::from_random_bytes(rng.gen()).into_uuid().to_string()
}
