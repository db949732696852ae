//! Cell grid of the WebGPU demo. [`CellGrid::step`] is the CPU twin of
//! [`crate::shaders::CELL_SIMULATION`].

use glam::Vec2;

/// Must match `@workgroup_size` in the simulation shader.
pub const WORKGROUP_SIZE: u32 = 8;

/// One cell: a square of two triangles, slightly inset from the slot.
#[rustfmt::skip]
pub const CELL_VERTICES: [f32; 12] = [
    -0.8, -0.8,
     0.8, -0.8,
     0.8,  0.8,

    -0.8, -0.8,
     0.8,  0.8,
    -0.8,  0.8,
];

pub const CELL_VERTEX_COUNT: u32 = (CELL_VERTICES.len() / 2) as u32;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridOptions {
    /// Cells per side.
    pub size: u32,
    /// Milliseconds between generations.
    pub step_ms: f64,
    /// Chance of a cell starting alive.
    pub density: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            size: 32,
            step_ms: 200.0,
            density: 0.4,
        }
    }
}

/// Contents of the `grid` uniform.
pub fn grid_uniform(size: u32) -> [f32; 2] {
    [size as f32; 2]
}

/// Workgroups per axis needed to cover `size` cells.
pub fn workgroup_count(size: u32) -> u32 {
    size.div_ceil(WORKGROUP_SIZE)
}

/// Clip-space position of `vertex` for cell `instance` of a live cell.
pub fn cell_position(vertex: Vec2, instance: u32, size: u32) -> Vec2 {
    let grid = Vec2::splat(size as f32);
    let i = instance as f32;
    let cell = Vec2::new(i % grid.x, (i / grid.x).floor());
    (vertex + 1.0) / grid - 1.0 + cell / grid * 2.0
}

/// Square grid of cell states, row-major from the bottom-left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGrid {
    size: u32,
    cells: Vec<u32>,
}

impl CellGrid {
    /// Panics if `size` is zero.
    pub fn empty(size: u32) -> Self {
        assert!(size > 0, "cell grid needs at least one cell per side");
        Self {
            size,
            cells: vec![0; (size * size) as usize],
        }
    }

    /// Each cell is alive when `rng()` falls below `density`. Panics if
    /// `size` is zero.
    pub fn seeded(size: u32, density: f64, mut rng: impl FnMut() -> f64) -> Self {
        assert!(size > 0, "cell grid needs at least one cell per side");
        let cells = (0..size * size).map(|_| u32::from(rng() < density)).collect();
        Self { size, cells }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y % self.size) * self.size + (x % self.size)) as usize
    }

    pub fn is_alive(&self, x: u32, y: u32) -> bool {
        self.cells[self.index(x, y)] != 0
    }

    pub fn set(&mut self, x: u32, y: u32, alive: bool) {
        let i = self.index(x, y);
        self.cells[i] = u32::from(alive);
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    fn neighbors(&self, x: u32, y: u32) -> u32 {
        let n = self.size;
        let (left, right) = (x + n - 1, x + 1);
        let (down, up) = (y + n - 1, y + 1);
        [
            (right, up),
            (right, y),
            (right, down),
            (x, down),
            (left, down),
            (left, y),
            (left, up),
            (x, up),
        ]
        .into_iter()
        .map(|(cx, cy)| self.cells[self.index(cx, cy)])
        .sum()
    }

    /// The next generation: survive on 2 or 3 neighbors, birth on 3.
    pub fn step(&self) -> CellGrid {
        let mut next = CellGrid::empty(self.size);
        for y in 0..self.size {
            for x in 0..self.size {
                let alive = match self.neighbors(x, y) {
                    2 => self.is_alive(x, y),
                    3 => true,
                    _ => false,
                };
                next.set(x, y, alive);
            }
        }
        next
    }
}

/// Fires at most once per interval of page time.
#[derive(Clone, Debug)]
pub struct StepClock {
    interval_ms: f64,
    last: Option<f64>,
    steps: u64,
}

impl StepClock {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last: None,
            steps: 0,
        }
    }

    /// Whether a generation is due at `now_ms`. The first call only primes
    /// the clock.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(last) = self.last else {
            self.last = Some(now_ms);
            return false;
        };
        if now_ms - last < self.interval_ms {
            return false;
        }
        self.last = Some(now_ms);
        self.steps += 1;
        true
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_cells(size: u32, alive: &[(u32, u32)]) -> CellGrid {
        let mut grid = CellGrid::empty(size);
        for &(x, y) in alive {
            grid.set(x, y, true);
        }
        grid
    }

    #[test]
    fn first_instance_sits_bottom_left() {
        // the corner vertex of cell 0 lands on the clip-space corner
        let p = cell_position(Vec2::splat(-1.0), 0, 32);
        assert_eq!(p, Vec2::splat(-1.0));
        // last cell's far corner lands on (1, 1)
        let p = cell_position(Vec2::ONE, 32 * 32 - 1, 32);
        assert!((p - Vec2::ONE).abs().max_element() < 1e-6);
    }

    #[test]
    fn instances_walk_rows() {
        let a = cell_position(Vec2::ZERO, 1, 4);
        let b = cell_position(Vec2::ZERO, 4, 4);
        assert_eq!(a, Vec2::new(-0.75 + 0.5, -0.75));
        assert_eq!(b, Vec2::new(-0.75, -0.75 + 0.5));
    }

    #[test]
    fn workgroups_cover_the_grid() {
        assert_eq!(workgroup_count(32), 4);
        assert_eq!(workgroup_count(33), 5);
        assert_eq!(workgroup_count(1), 1);
        assert_eq!(grid_uniform(32), [32.0, 32.0]);
        assert_eq!(CELL_VERTEX_COUNT, 6);
    }

    #[test]
    fn blinker_oscillates() {
        let horizontal = with_cells(5, &[(1, 2), (2, 2), (3, 2)]);
        let vertical = with_cells(5, &[(2, 1), (2, 2), (2, 3)]);
        assert_eq!(horizontal.step(), vertical);
        assert_eq!(vertical.step(), horizontal);
    }

    #[test]
    fn block_is_stable_across_the_wrap() {
        // a 2x2 block split over the corners of the torus
        let block = with_cells(6, &[(5, 5), (0, 5), (5, 0), (0, 0)]);
        assert_eq!(block.step(), block);
        assert_eq!(block.population(), 4);
    }

    #[test]
    fn lonely_cells_die() {
        let grid = with_cells(8, &[(3, 3)]);
        assert_eq!(grid.step().population(), 0);
    }

    #[test]
    fn seeding_follows_density() {
        let mut values = [0.1, 0.9].into_iter().cycle();
        let grid = CellGrid::seeded(4, 0.5, || values.next().unwrap());
        assert_eq!(grid.population(), 8);
        assert!(grid.is_alive(0, 0));
        assert!(!grid.is_alive(1, 0));
        assert_eq!(CellGrid::seeded(4, 0.0, || 0.0).population(), 0);
    }

    #[test]
    #[should_panic(expected = "at least one cell")]
    fn empty_grid_of_size_zero_panics() {
        CellGrid::empty(0);
    }

    #[test]
    #[should_panic(expected = "at least one cell")]
    fn seeded_grid_of_size_zero_panics() {
        CellGrid::seeded(0, 0.5, || 0.0);
    }

    #[test]
    fn clock_steps_once_per_interval() {
        let mut clock = StepClock::new(200.0);
        assert!(!clock.tick(0.0));
        assert!(!clock.tick(150.0));
        assert!(clock.tick(200.0));
        assert!(!clock.tick(300.0));
        assert!(clock.tick(410.0));
        assert_eq!(clock.steps(), 2);
    }
}
