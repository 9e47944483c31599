use crate::matrix::Mat3;
use crate::vec::vec3::Vec3;

pub mod equilibrium;

// Dimension of the particle system.
pub const DIM: usize = 3;

// The microstate of a gas of non-interacting point particles on the periodic
// unit cube. Particles move ballistically between stochastic pairwise
// collisions; the collision rotation is supplied by the caller.
#[derive(Debug, Clone)]
pub struct GasState {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
}

impl GasState {
    pub fn new(num_particles: usize) -> Self {
        Self {
            positions: vec![Vec3::default(); num_particles],
            velocities: vec![Vec3::default(); num_particles],
        }
    }

    pub fn num_particles(&self) -> usize {
        self.velocities.len()
    }

    pub fn pos(&self, index: usize) -> Vec3 {
        self.positions[index]
    }

    pub fn pos_mut(&mut self, index: usize) -> &mut Vec3 {
        &mut self.positions[index]
    }

    pub fn vel(&self, index: usize) -> Vec3 {
        self.velocities[index]
    }

    pub fn vel_mut(&mut self, index: usize) -> &mut Vec3 {
        &mut self.velocities[index]
    }

    // Maps a coordinate back onto the unit cell with a single add or
    // subtract. Assumes |v| * dt stays well below one cell width; a larger
    // step is not reduced further.
    pub fn periodic_wrap(x: f64) -> f64 {
        if x > 1.0 {
            x - 1.0
        } else if x < 0.0 {
            x + 1.0
        } else {
            x
        }
    }

    pub fn update_pos(&mut self, index: usize, dt: f64) {
        let step = self.velocities[index] * dt;
        let position = &mut self.positions[index];

        position.x = Self::periodic_wrap(position.x + step.x);
        position.y = Self::periodic_wrap(position.y + step.y);
        position.z = Self::periodic_wrap(position.z + step.z);
    }

    pub fn update_all_pos(&mut self, dt: f64) {
        for index in 0..self.num_particles() {
            self.update_pos(index, dt);
        }
    }

    // Collides a pair: both outgoing velocities share the pair's mean
    // velocity, displaced by the rotated relative velocity. The caller's
    // matrix carries the half scale of the DSMC update.
    pub fn update_vel(&mut self, rotation: Mat3, idx_a: usize, idx_b: usize) {
        let u_a = self.velocities[idx_a];
        let u_b = self.velocities[idx_b];

        let v_rel = rotation * (u_a - u_b);
        let u_cm = (u_a + u_b) * 0.5;

        self.velocities[idx_a] = u_cm + v_rel;
        self.velocities[idx_b] = u_cm - v_rel;
    }

    pub fn update(
        &mut self,
        rotation: Mat3,
        idx_a: usize,
        idx_b: usize,
        move_positions: bool,
        dt: f64,
    ) {
        self.update_vel(rotation, idx_a, idx_b);

        if move_positions {
            self.update_pos(idx_a, dt);
            self.update_pos(idx_b, dt);
        }
    }
}
