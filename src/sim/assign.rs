// assign.rs - Particle to attraction point assignment
//
// Purely positional: particle i gets point i (shifted by the parallax
// offset). No distance search, so the cost is linear in particle count.

use super::{Mode, Particle};
use crate::layout::Point;

/// Drop every particle back to idle. Runs at the start of each frame.
pub fn reset(particles: &mut [Particle]) {
    for p in particles {
        p.mode = Mode::Idle;
    }
}

/// Hand out points in index order. With `reuse` the point sequence repeats
/// until every particle has one; without it, leftover particles stay idle.
/// Returns how many particles are targeting.
pub fn assign(particles: &mut [Particle], points: &[Point], offset: Point, reuse: bool) -> usize {
    let shift = |pt: &Point| Point::new(pt.x + offset.x, pt.y + offset.y);

    let mut assigned = 0;
    if reuse {
        for (p, pt) in particles.iter_mut().zip(points.iter().cycle()) {
            p.mode = Mode::Targeting(shift(pt));
            assigned += 1;
        }
    } else {
        for (p, pt) in particles.iter_mut().zip(points) {
            p.mode = Mode::Targeting(shift(pt));
            assigned += 1;
        }
    }
    assigned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;

    fn particles(n: usize) -> Vec<Particle> {
        let config = FieldConfig::default();
        let mut rng = 42;
        (0..n).map(|_| Particle::new(0.0, 0.0, 9, &config, &mut rng)).collect()
    }

    fn points(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f32, 0.0)).collect()
    }

    #[test]
    fn leftovers_stay_idle_without_reuse() {
        let mut ps = particles(5);
        assert_eq!(assign(&mut ps, &points(3), Point::default(), false), 3);
        assert_eq!(ps[2].mode, Mode::Targeting(Point::new(2.0, 0.0)));
        assert!(!ps[3].is_targeting());
        assert!(!ps[4].is_targeting());
    }

    #[test]
    fn reuse_wraps_the_point_index() {
        let mut ps = particles(5);
        assert_eq!(assign(&mut ps, &points(3), Point::default(), true), 5);
        assert_eq!(ps[3].mode, Mode::Targeting(Point::new(0.0, 0.0)));
        assert_eq!(ps[4].mode, Mode::Targeting(Point::new(1.0, 0.0)));
    }

    #[test]
    fn extra_points_are_ignored() {
        let mut ps = particles(2);
        assert_eq!(assign(&mut ps, &points(10), Point::default(), false), 2);
    }

    #[test]
    fn no_points_means_no_targets() {
        let mut ps = particles(4);
        assert_eq!(assign(&mut ps, &[], Point::default(), true), 0);
        assert!(ps.iter().all(|p| !p.is_targeting()));
    }

    #[test]
    fn offset_shifts_targets() {
        let mut ps = particles(1);
        assign(&mut ps, &[Point::new(10.0, 10.0)], Point::new(-2.0, 3.0), false);
        assert_eq!(ps[0].mode, Mode::Targeting(Point::new(8.0, 13.0)));
    }

    #[test]
    fn reset_clears_targets() {
        let mut ps = particles(3);
        assign(&mut ps, &points(3), Point::default(), false);
        reset(&mut ps);
        assert!(ps.iter().all(|p| p.mode == Mode::Idle));
    }
}
