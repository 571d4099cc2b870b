//! Short-code generation and allocation policy.

use rand::Rng;

use crate::config::CollisionPolicy;
use crate::error::ApiError;
use crate::storage::Storage;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated codes. 62^6 gives ~56.8B codes, so collisions are
/// handled by retry rather than by algorithmic guarantee.
pub const CODE_LENGTH: usize = 6;

/// Occupied-code draws tolerated before the collision policy kicks in.
const MAX_COLLISION_ATTEMPTS: u32 = 5;

/// Generate a random code of `length` characters over `[A-Za-z0-9]`.
/// Not cryptographically secure.
pub fn generate(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// A caller-chosen alias must match `^[A-Za-z0-9_-]{3,20}$`.
pub fn is_valid_alias(alias: &str) -> bool {
    (3..=20).contains(&alias.len())
        && alias
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Any absolute URL with a scheme is accepted, including non-HTTP schemes.
/// Deliberately permissive; kept as the original behavior.
pub fn is_valid_url(url: &str) -> bool {
    url::Url::parse(url).is_ok()
}

/// Resolve the short code for a create request.
///
/// With an alias: validate the format, reject if taken, use it verbatim.
/// Without: draw random codes, retrying on collision up to
/// [`MAX_COLLISION_ATTEMPTS`] times; exhaustion falls through to the
/// configured [`CollisionPolicy`].
pub async fn allocate(
    storage: &dyn Storage,
    alias: Option<&str>,
    policy: CollisionPolicy,
) -> Result<String, ApiError> {
    if let Some(alias) = alias {
        if !is_valid_alias(alias) {
            return Err(ApiError::Validation(
                "Invalid alias. Must be 3-20 characters and contain only letters, numbers, hyphens, and underscores."
                    .to_string(),
            ));
        }

        if storage.get(alias).await?.is_some() {
            return Err(ApiError::Conflict("Alias already exists".to_string()));
        }

        return Ok(alias.to_string());
    }

    let mut code = generate(CODE_LENGTH);
    let mut attempts = 0;
    while attempts < MAX_COLLISION_ATTEMPTS {
        if storage.get(&code).await?.is_none() {
            return Ok(code);
        }
        code = generate(CODE_LENGTH);
        attempts += 1;
    }

    match policy {
        CollisionPolicy::Proceed => {
            tracing::warn!(
                attempts = MAX_COLLISION_ATTEMPTS,
                "collision retries exhausted, proceeding with unchecked code"
            );
            Ok(code)
        }
        CollisionPolicy::Fail => Err(ApiError::Internal(anyhow::anyhow!(
            "failed to generate a unique short code after {MAX_COLLISION_ATTEMPTS} attempts"
        ))),
    }
}
