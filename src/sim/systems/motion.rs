//! Motion integration
//!
//! Each live body advances by its velocity once per tick and bounces off the
//! arena walls. Bodies are independent, so the pass runs in parallel.

use rayon::prelude::*;

use crate::sim::body::Body;

/// Advance every live body by one tick.
///
/// Walls only reflect velocity; positions are never clamped, so a body may
/// overshoot a wall by up to one step.
pub fn integrate(bodies: &mut [Body], width: f32, height: f32) {
    bodies.par_iter_mut().for_each(|body| {
        if !body.alive {
            return;
        }
        step(body, width, height);
    });
}

/// Move one body and reflect its velocity off any wall within one radius
#[inline]
pub fn step(body: &mut Body, width: f32, height: f32) {
    body.position += body.velocity;

    let r = body.radius_f32();
    if body.position.x < r || body.position.x > width - r {
        body.velocity.x = -body.velocity.x;
    }
    if body.position.y < r || body.position.y > height - r {
        body.velocity.y = -body.velocity.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Rgba;
    use crate::util::vec2::Vec2;

    const W: f32 = 640.0;
    const H: f32 = 480.0;

    fn body(x: f32, y: f32, vx: f32, vy: f32) -> Body {
        Body::new(Vec2::new(x, y), Vec2::new(vx, vy), 10, Rgba::opaque(255, 0, 0))
    }

    #[test]
    fn test_position_integration() {
        let mut bodies = vec![body(100.0, 100.0, 2.0, -1.5)];
        integrate(&mut bodies, W, H);
        assert_eq!(bodies[0].position, Vec2::new(102.0, 98.5));
        assert_eq!(bodies[0].velocity, Vec2::new(2.0, -1.5));
    }

    #[test]
    fn test_reflects_off_right_wall() {
        let mut bodies = vec![body(628.0, 200.0, 3.0, 1.0)];
        integrate(&mut bodies, W, H);
        // 631 > 640 - 10
        assert_eq!(bodies[0].position.x, 631.0);
        assert_eq!(bodies[0].velocity, Vec2::new(-3.0, 1.0));
    }

    #[test]
    fn test_reflects_off_top_wall() {
        let mut bodies = vec![body(200.0, 11.0, 0.0, -2.0)];
        integrate(&mut bodies, W, H);
        assert_eq!(bodies[0].position.y, 9.0);
        assert_eq!(bodies[0].velocity, Vec2::new(0.0, 2.0));
    }

    #[test]
    fn test_corner_reflects_both_axes() {
        let mut bodies = vec![body(11.0, 471.0, -2.0, 2.0)];
        integrate(&mut bodies, W, H);
        assert_eq!(bodies[0].velocity, Vec2::new(2.0, -2.0));
    }

    #[test]
    fn test_dead_bodies_not_updated() {
        let mut bodies = vec![body(100.0, 100.0, 2.0, 2.0)];
        bodies[0].alive = false;
        integrate(&mut bodies, W, H);
        assert_eq!(bodies[0].position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_speed_never_amplified() {
        let mut bodies = vec![body(W / 2.0, H / 2.0, 3.0, -2.5)];
        for _ in 0..10_000 {
            integrate(&mut bodies, W, H);
            assert!(bodies[0].velocity.x.abs() <= 3.0);
            assert!(bodies[0].velocity.y.abs() <= 2.5);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut parallel: Vec<Body> = (0..500)
            .map(|i| body(20.0 + i as f32, 20.0 + (i % 400) as f32, 1.5, -0.5))
            .collect();
        let mut sequential = parallel.clone();

        for _ in 0..50 {
            integrate(&mut parallel, W, H);
            for b in sequential.iter_mut() {
                step(b, W, H);
            }
        }

        assert_eq!(parallel, sequential);
    }
}
