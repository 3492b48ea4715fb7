//! Completion burst: kicks the resting pile back into motion.

use crate::config::{EXPLODE_VX, EXPLODE_VY};
use crate::grain::Grain;
use crate::math::{GrainRng, Vec2};

/// Unsettle every active, settled grain and launch it upward.
///
/// Grains that are still falling are left untouched. Returns the number of
/// grains kicked.
pub fn explode(grains: &mut [Grain], rng: &mut GrainRng) -> usize {
    let mut kicked = 0;
    for grain in grains.iter_mut().filter(|g| g.active && g.settled) {
        grain.settled = false;
        grain.velocity = Vec2::new(
            rng.symmetric(EXPLODE_VX),
            rng.range(EXPLODE_VY.0, EXPLODE_VY.1),
        );
        kicked += 1;
    }
    kicked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grain(active: bool, settled: bool) -> Grain {
        let mut grain = Grain::reserve(Vec2::new(10.0, 10.0), 2.0, 0.0);
        grain.active = active;
        grain.settled = settled;
        grain
    }

    #[test]
    fn only_resting_active_grains_are_kicked() {
        let mut grains = vec![grain(true, true), grain(true, false), grain(false, true)];
        grains[1].velocity = Vec2::new(3.0, 40.0);

        let kicked = explode(&mut grains, &mut GrainRng::new(9));
        assert_eq!(kicked, 1);

        assert!(!grains[0].settled);
        assert!(grains[0].velocity.y < 0.0);
        assert!(grains[0].velocity.x.abs() <= EXPLODE_VX);

        assert_eq!(grains[1].velocity, Vec2::new(3.0, 40.0));
        assert!(grains[2].settled);
        assert!(!grains[2].active);
    }

    #[test]
    fn empty_pile_is_a_no_op() {
        let mut grains: Vec<Grain> = Vec::new();
        assert_eq!(explode(&mut grains, &mut GrainRng::new(1)), 0);
    }
}
