use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};

use crate::vec::vec3::Vec3;

use super::{GasState, DIM};

// Temperature of the equilibrated gas, in units where k_B = m = 1. The
// sampling contracts downstream are calibrated against this value.
pub const TEMPERATURE: f64 = 2.0;

// Scatters every particle uniformly over the unit cube.
pub fn equilibrate_positions<R: Rng>(state: &mut GasState, rng: &mut R) {
    for index in 0..state.num_particles() {
        let position = state.pos_mut(index);

        position.x = rng.random();
        position.y = rng.random();
        position.z = rng.random();
    }
}

// Draws Maxwell-Boltzmann velocities at TEMPERATURE, then corrects the
// sample: the net momentum is forced to zero and the kinetic energy is
// rescaled so the mean square velocity per axis equals the temperature
// exactly rather than only in expectation.
pub fn equilibrate_velocities<R: Rng>(state: &mut GasState, rng: &mut R) -> Result<(), NormalError> {
    let std_dev = TEMPERATURE.sqrt();
    let normal = Normal::new(0.0, std_dev)?;

    for index in 0..state.num_particles() {
        let velocity = state.vel_mut(index);

        velocity.x = normal.sample(rng);
        velocity.y = normal.sample(rng);
        velocity.z = normal.sample(rng);
    }

    let mut v_cm = Vec3::new();

    for index in 0..state.num_particles() {
        v_cm += state.vel(index);
    }

    v_cm /= state.num_particles() as f64;

    for index in 0..state.num_particles() {
        *state.vel_mut(index) -= v_cm;
    }

    let mut avg_energy = 0.0;

    for index in 0..state.num_particles() {
        let velocity = state.vel(index);

        avg_energy += velocity.dot(velocity);
    }

    avg_energy /= (DIM * state.num_particles()) as f64;

    let scale = std_dev / avg_energy.sqrt();

    for index in 0..state.num_particles() {
        *state.vel_mut(index) *= scale;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    const NUM_PARTICLES: usize = 512;

    fn equilibrated(seed: u64) -> GasState {
        let mut state = GasState::new(NUM_PARTICLES);
        let mut rng = StdRng::seed_from_u64(seed);

        equilibrate_positions(&mut state, &mut rng);
        equilibrate_velocities(&mut state, &mut rng).unwrap();

        state
    }

    #[test]
    fn test_positions_land_inside_the_unit_cube() {
        let state = equilibrated(7);

        for index in 0..state.num_particles() {
            let position = state.pos(index);

            assert!((0.0..1.0).contains(&position.x));
            assert!((0.0..1.0).contains(&position.y));
            assert!((0.0..1.0).contains(&position.z));
        }
    }

    #[test]
    fn test_net_momentum_is_removed() {
        let state = equilibrated(7);

        let mut v_cm = Vec3::new();

        for index in 0..state.num_particles() {
            v_cm += state.vel(index);
        }

        v_cm /= state.num_particles() as f64;

        assert!(v_cm.mag() < 1e-12);
    }

    #[test]
    fn test_kinetic_energy_matches_the_temperature() {
        let state = equilibrated(7);

        let mut avg_energy = 0.0;

        for index in 0..state.num_particles() {
            avg_energy += state.vel(index).dot(state.vel(index));
        }

        avg_energy /= (DIM * state.num_particles()) as f64;

        assert!((avg_energy - TEMPERATURE).abs() < 1e-12);
    }

    #[test]
    fn test_equilibration_is_deterministic_per_seed() {
        let a = equilibrated(1234);
        let b = equilibrated(1234);
        let c = equilibrated(4321);

        for index in 0..a.num_particles() {
            assert_eq!(a.pos(index), b.pos(index));
            assert_eq!(a.vel(index), b.vel(index));
        }

        let mut all_equal = true;

        for index in 0..a.num_particles() {
            if a.vel(index) != c.vel(index) {
                all_equal = false;
            }
        }

        assert!(!all_equal);
    }
}
