//! Role assignment: which seats are spies.

use rand::Rng;
use rand::seq::index;

use crate::SessionError;

/// Marks `spy_count` distinct seats out of `player_count` as spies.
///
/// Returns one flag per seat, `true` for a spy. Seats are sampled
/// uniformly without replacement, so every seat is equally likely to be a
/// spy and exactly `spy_count` flags are set.
///
/// # Errors
/// [`SessionError::InvalidConfiguration`] unless
/// `1 <= spy_count < player_count`.
///
/// ```rust
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use spyglass_session::assign_roles;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let roles = assign_roles(5, 2, &mut rng).unwrap();
/// assert_eq!(roles.len(), 5);
/// assert_eq!(roles.iter().filter(|spy| **spy).count(), 2);
/// ```
pub fn assign_roles<R>(
    player_count: usize,
    spy_count: usize,
    rng: &mut R,
) -> Result<Vec<bool>, SessionError>
where
    R: Rng + ?Sized,
{
    if spy_count < 1 || spy_count >= player_count {
        return Err(SessionError::invalid(format!(
            "cannot assign {spy_count} spies among {player_count} players"
        )));
    }

    let mut roles = vec![false; player_count];
    for seat in index::sample(rng, player_count, spy_count).into_iter() {
        roles[seat] = true;
    }
    Ok(roles)
}
