//! Perspective projection of a [`CorridorScan`] into the nested trapezoids of
//! the first-person view. Pure geometry: callers decide how to paint each
//! [`Surface`].

use crate::navigator::{CorridorScan, Sight};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

/// Axis-aligned rectangle from corner `a` (top left) to corner `b` (bottom right).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub ax: f32,
    pub ay: f32,
    pub bx: f32,
    pub by: f32,
}

impl Bounds {
    pub const fn new(ax: f32, ay: f32, bx: f32, by: f32) -> Self {
        Bounds { ax, ay, bx, by }
    }

    pub fn width(&self) -> f32 {
        self.bx - self.ax
    }

    pub fn height(&self) -> f32 {
        self.by - self.ay
    }

    pub fn contains(&self, p: Point) -> bool {
        (self.ax..=self.bx).contains(&p.x) && (self.ay..=self.by).contains(&p.y)
    }
}

/// Convex quadrilateral given by its corners in drawing order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad(pub [Point; 4]);

impl Quad {
    /// Whether `p` lies inside or on the edge of the quad. Works for either winding.
    pub fn contains(&self, p: Point) -> bool {
        const EPS: f32 = 1e-4;
        let crosses = (0..4).map(|i| {
            let a = self.0[i];
            let b = self.0[(i + 1) % 4];
            (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
        });
        let (mut pos, mut neg) = (false, false);
        for cross in crosses {
            pos |= cross > EPS;
            neg |= cross < -EPS;
        }
        !(pos && neg)
    }
}

/// Tuning of the corridor projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewConfig {
    /// Screen distance between two consecutive depth steps.
    pub cell_length: f32,
    /// Deepest corridor drawn before the far end fades into fog.
    pub max_depth: usize,
    /// Angle of the floor and ceiling edges, in degrees.
    pub alpha_degrees: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            cell_length: 70.0,
            max_depth: 5,
            alpha_degrees: 45.0,
        }
    }
}

impl ViewConfig {
    /// Scale the cell length so that the deepest corridor still leaves a back wall
    /// inside `viewport`.
    pub fn fit(viewport: Bounds, max_depth: usize) -> Self {
        let mut config = ViewConfig {
            max_depth: max_depth.max(1),
            ..Default::default()
        };
        let ratio = config.slope();
        let half = (viewport.width() / 2.0).min(viewport.height() / (2.0 * ratio));
        config.cell_length = half / (config.max_depth + 1) as f32;
        config
    }

    /// Vertical inset per unit of horizontal inset.
    fn slope(&self) -> f32 {
        let alpha = self.alpha_degrees.to_radians();
        let beta = (90.0 - self.alpha_degrees).to_radians();
        beta.sin() / alpha.sin()
    }

    /// The `max_depth` to pass to [`crate::navigator::MazeNavigator::scan_corridors`]
    /// so that fog shows up exactly when the corridor outruns the view.
    pub fn scan_depth(&self) -> usize {
        self.max_depth.saturating_sub(1)
    }
}

/// What the far end of the corridor looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackWall {
    Solid,
    /// The end cell is somewhere down this corridor.
    Goal,
    /// The corridor runs past the view depth.
    Fog,
}

/// A gap in a side wall where a side corridor branches off.
///
/// `near` and `far` are horizontal distances from the viewport edge; `inset` is
/// the vertical distance from the top and bottom edges to the opening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideOpening {
    pub near: f32,
    pub far: f32,
    pub inset: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Ceiling,
    Floor,
    LeftWall,
    RightWall,
    LeftOpening,
    RightOpening,
    BackWall,
    Goal,
    Fog,
}

/// The projected first-person view of one corridor scan.
#[derive(Debug, Clone, PartialEq)]
pub struct CorridorView {
    pub viewport: Bounds,
    pub floor: Quad,
    pub ceiling: Quad,
    pub left_wall: Quad,
    pub right_wall: Quad,
    /// The far end of the corridor, nested inside the four trapezoids.
    pub back: Bounds,
    pub back_wall: BackWall,
    pub left_openings: Vec<SideOpening>,
    pub right_openings: Vec<SideOpening>,
}

impl CorridorView {
    pub fn project(scan: &CorridorScan, viewport: Bounds, config: &ViewConfig) -> Self {
        let visible = scan.depth();
        let fogged = visible >= config.max_depth;
        let depth = if fogged {
            config.max_depth.saturating_sub(1)
        } else {
            visible
        };

        let a = config.cell_length * (1 + depth) as f32;
        let b = a * config.slope();
        let Bounds { ax, ay, bx, by } = viewport;
        let back = Bounds::new(ax + a, ay + b, bx - a, by - b);

        let back_wall = if fogged {
            BackWall::Fog
        } else if scan.goal_distance().is_some() {
            BackWall::Goal
        } else {
            BackWall::Solid
        };

        let openings = |lane: &str| -> Vec<SideOpening> {
            CorridorScan::nearest_first(lane)
                .into_iter()
                .take(depth)
                .enumerate()
                .filter(|&(_, sight)| sight != Sight::Blocked)
                .map(|(i, _)| SideOpening {
                    near: i as f32 * a / depth as f32,
                    far: (i + 1) as f32 * a / depth as f32,
                    inset: (i + 1) as f32 * b / depth as f32,
                })
                .collect()
        };

        let corner = Point::new;
        CorridorView {
            viewport,
            floor: Quad([
                corner(ax, by),
                corner(ax + a, by - b),
                corner(bx - a, by - b),
                corner(bx, by),
            ]),
            ceiling: Quad([
                corner(ax, ay),
                corner(ax + a, ay + b),
                corner(bx - a, ay + b),
                corner(bx, ay),
            ]),
            left_wall: Quad([
                corner(ax, by),
                corner(ax + a, by - b),
                corner(ax + a, ay + b),
                corner(ax, ay),
            ]),
            right_wall: Quad([
                corner(bx, by),
                corner(bx - a, by - b),
                corner(bx - a, ay + b),
                corner(bx, ay),
            ]),
            back,
            back_wall,
            left_openings: openings(&scan.left),
            right_openings: openings(&scan.right),
        }
    }

    /// Classify a viewport point. Returns `None` outside the viewport.
    pub fn surface_at(&self, p: Point) -> Option<Surface> {
        if !self.viewport.contains(p) {
            return None;
        }
        if self.back.contains(p) {
            return Some(match self.back_wall {
                BackWall::Solid => Surface::BackWall,
                BackWall::Goal => Surface::Goal,
                BackWall::Fog => Surface::Fog,
            });
        }
        if self.left_wall.contains(p) {
            let from_edge = p.x - self.viewport.ax;
            return Some(self.side_surface(
                p,
                from_edge,
                &self.left_openings,
                Surface::LeftWall,
                Surface::LeftOpening,
            ));
        }
        if self.right_wall.contains(p) {
            let from_edge = self.viewport.bx - p.x;
            return Some(self.side_surface(
                p,
                from_edge,
                &self.right_openings,
                Surface::RightWall,
                Surface::RightOpening,
            ));
        }
        if self.ceiling.contains(p) {
            return Some(Surface::Ceiling);
        }
        Some(Surface::Floor)
    }

    fn side_surface(
        &self,
        p: Point,
        from_edge: f32,
        openings: &[SideOpening],
        wall: Surface,
        opening: Surface,
    ) -> Surface {
        match openings
            .iter()
            .find(|o| (o.near..=o.far).contains(&from_edge))
        {
            None => wall,
            Some(o) if p.y < self.viewport.ay + o.inset => Surface::Ceiling,
            Some(o) if p.y > self.viewport.by - o.inset => Surface::Floor,
            Some(_) => opening,
        }
    }
}
