use std::f64::consts::PI;

use rand::{rngs::StdRng, SeedableRng};

use buffer::SampleBuffer;
use error::DiceError;

use crate::{
    debug_print,
    matrix::Mat3,
    physics::gas::{
        equilibrium::{equilibrate_positions, equilibrate_velocities},
        GasState, DIM,
    },
    vec::vec3::Vec3,
};

pub mod buffer;
pub mod error;

// A pseudo-random number generator whose entropy pool is the microstate of a
// toy gas: particle positions are harvested as uniforms, post-collision
// relative velocities as Gaussians, and per-axis pair kinetic energies as
// exponentials. Equilibrium statistical mechanics supplies each marginal.
//
// The gas evolves by DSMC-style stochastic pair collisions; the half scale
// folded into the rotation matrix is the generator's defining peculiarity
// and must not be "fixed" to a unit rotation.
#[derive(Debug, Clone)]
pub struct MolecularDice {
    state: GasState,

    // One buffer per distribution, each refilled by a single collision; the
    // internal uniform buffer is refilled from the position pool instead.
    unip: SampleBuffer<{ 2 * DIM }>,
    unif: SampleBuffer<{ 2 * DIM }>,
    norm: SampleBuffer<DIM>,
    expo: SampleBuffer<DIM>,

    rotation: Mat3,

    // Collision pair selection scheme: the k-th pair of a parameter epoch is
    // (start + k * shift, start + k * shift + jump), both reduced mod n.
    start: usize,
    shift: usize,
    jump: usize,
    idx_a: usize,
    idx_b: usize,

    // Internal-uniform refills since the last global position drift.
    unip_buffers_filled: usize,
    max_unip_buffers_filled: usize,

    // Collisions since the last rotation/pair-scheme refresh.
    pairs_collided: usize,
    max_pairs_collided: usize,

    // Time gap between consecutive collisions.
    dt: f64,
}

impl MolecularDice {
    pub const DEFAULT_SEED: u64 = 1234;
    pub const DEFAULT_NUM_PARTICLES: usize = 131072;
    pub const DEFAULT_DT: f64 = 0.1;

    // Equilibrates a fresh gas with an external seed source, then steps it
    // once so served positions are decoupled from the raw seed draws. The
    // seed source is dropped before `new` returns.
    pub fn new(seed: u64, num_particles: usize, dt: f64) -> Result<Self, DiceError> {
        let max_unip_buffers_filled = (DIM * num_particles) / (2 * DIM);
        let max_pairs_collided = num_particles / 8;

        if max_pairs_collided < 2 {
            return Err(DiceError::InvalidArguments(
                "use more particles for the generator state (16 at minimum)".to_string(),
            ));
        }

        let mut state = GasState::new(num_particles);

        let mut seed_rng = StdRng::seed_from_u64(seed);

        equilibrate_positions(&mut state, &mut seed_rng);
        equilibrate_velocities(&mut state, &mut seed_rng)?;

        state.update_all_pos(dt);

        debug_print!("equilibrated {} particles (dt = {})", num_particles, dt);

        let mut dice = Self {
            state,
            unip: Default::default(),
            unif: Default::default(),
            norm: Default::default(),
            expo: Default::default(),
            rotation: Mat3::identity(),
            start: 0,
            shift: 0,
            jump: 0,
            idx_a: 0,
            idx_b: 0,
            unip_buffers_filled: 0,
            max_unip_buffers_filled,
            pairs_collided: 0,
            max_pairs_collided,
            dt,
        };

        // First parameter draw; this also pays for the first refill of the
        // internal uniform pool.
        dice.refresh_rand_rot_matrix_params();
        dice.refresh_rand_pair_select_params();

        Ok(dice)
    }

    /// Returns a random real uniformly distributed over (0, 1], modulo the
    /// periodic-wrap boundary.
    pub fn uniform(&mut self) -> f64 {
        if self.unif.is_exhausted() {
            self.refill_unif_buffer();
            self.unif.reset();
        }

        self.unif.take()
    }

    /// Returns a random real normally distributed with mean 0 and variance 1.
    pub fn normal(&mut self) -> f64 {
        if self.norm.is_exhausted() {
            self.refill_norm_buffer();
            self.norm.reset();
        }

        self.norm.take()
    }

    /// Returns a random real exponentially distributed as exp(-x) over
    /// [0, inf).
    pub fn exp(&mut self) -> f64 {
        if self.expo.is_exhausted() {
            self.refill_expo_buffer();
            self.expo.reset();
        }

        self.expo.take()
    }

    // Uniform variates reserved for the generator's own parameter draws.
    fn uniform_private(&mut self) -> f64 {
        if self.unip.is_exhausted() {
            self.refill_unip_buffer();
            self.unip.reset();
        }

        self.unip.take()
    }

    // Once every coordinate in the pool has been served as an internal
    // uniform, drift all particles to produce a fresh pool.
    fn refresh_unip_pool(&mut self) {
        if self.unip_buffers_filled >= self.max_unip_buffers_filled {
            self.state.update_all_pos(self.dt);
            self.unip_buffers_filled = 0;
        }
    }

    // A random Euler-angle triplet picks the collision rotation; the half
    // scale folds the DSMC relative-velocity factor into the matrix itself.
    fn refresh_rand_rot_matrix_params(&mut self) {
        let alpha = 2.0 * PI * self.uniform_private();
        let theta = PI * self.uniform_private();
        let phi = 2.0 * PI * self.uniform_private();

        let axis = Vec3 {
            x: theta.sin() * phi.cos(),
            y: theta.sin() * phi.sin(),
            z: theta.cos(),
        };

        self.rotation = Mat3::axis_angle(axis, alpha) * 0.5;
    }

    fn refresh_rand_pair_select_params(&mut self) {
        let num = self.state.num_particles();

        self.start = (self.uniform_private() * num as f64) as usize;
        self.shift = (self.uniform_private()
            * (num as f64 / (self.max_pairs_collided as f64 - 1.0) - 1.0))
            as usize
            + 1;
        self.jump = (self.uniform_private() * (num as f64 - 1.0)) as usize + 1;
    }

    // Brings in a new rotation and pair-selection scheme once the current
    // parameters have served a full epoch of collisions.
    fn refresh_rand_params(&mut self) {
        if self.pairs_collided >= self.max_pairs_collided {
            self.refresh_rand_rot_matrix_params();
            self.refresh_rand_pair_select_params();
            self.pairs_collided = 0;
        }
    }

    // One conditional subtract stands in for the modulo: `shift` is bounded
    // so that (max_pairs_collided - 1) * shift < n, and jump < n, keeping
    // both sums below 2n.
    fn refresh_collision_pair(&mut self) {
        let num = self.state.num_particles();

        let mut idx_a = self.start + self.pairs_collided * self.shift;

        if idx_a >= num {
            idx_a -= num;
        }

        let mut idx_b = idx_a + self.jump;

        if idx_b >= num {
            idx_b -= num;
        }

        self.idx_a = idx_a;
        self.idx_b = idx_b;
    }

    // Serves the position coordinates of two successive pool particles as
    // internal uniforms.
    fn refill_unip_buffer(&mut self) {
        self.refresh_unip_pool();

        let idx_a = 2 * self.unip_buffers_filled;
        let idx_b = idx_a + 1;

        self.unip_buffers_filled += 1;

        let pos_a = self.state.pos(idx_a);
        let pos_b = self.state.pos(idx_b);

        self.unip.values = [pos_a.x, pos_a.y, pos_a.z, pos_b.x, pos_b.y, pos_b.z];
    }

    // Collides the next pair, moving both particles, and serves their
    // post-collision positions.
    fn refill_unif_buffer(&mut self) {
        self.refresh_rand_params();
        self.refresh_collision_pair();

        self.state
            .update(self.rotation, self.idx_a, self.idx_b, true, self.dt);

        self.pairs_collided += 1;

        let pos_a = self.state.pos(self.idx_a);
        let pos_b = self.state.pos(self.idx_b);

        self.unif.values = [pos_a.x, pos_a.y, pos_a.z, pos_b.x, pos_b.y, pos_b.z];
    }

    // Collides the next pair in place and serves the components of the
    // outgoing relative velocity, halved.
    fn refill_norm_buffer(&mut self) {
        self.refresh_rand_params();
        self.refresh_collision_pair();

        self.state
            .update(self.rotation, self.idx_a, self.idx_b, false, 0.0);

        self.pairs_collided += 1;

        let v_rel = (self.state.vel(self.idx_a) - self.state.vel(self.idx_b)) * 0.5;

        self.norm.values = [v_rel.x, v_rel.y, v_rel.z];
    }

    // Collides the next pair in place and serves, per axis, the pair's mean
    // kinetic energy.
    fn refill_expo_buffer(&mut self) {
        self.refresh_rand_params();
        self.refresh_collision_pair();

        self.state
            .update(self.rotation, self.idx_a, self.idx_b, false, 0.0);

        self.pairs_collided += 1;

        let vel_a = self.state.vel(self.idx_a);
        let vel_b = self.state.vel(self.idx_b);

        self.expo.values = [
            0.25 * (vel_a.x * vel_a.x + vel_b.x * vel_b.x),
            0.25 * (vel_a.y * vel_a.y + vel_b.y * vel_b.y),
            0.25 * (vel_a.z * vel_a.z + vel_b.z * vel_b.z),
        ];
    }
}
