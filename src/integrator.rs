//! Primary visibility, direct shading and the bounded mirror-bounce loop

use nalgebra::Vector4;
use std::ops::{Add, AddAssign};

use crate::intersect::intersect;
use crate::math::{reflect, Color, Ray};
use crate::scene::Scene;
use crate::shade::shade_counted;
use crate::T_MIN;

/// Query counters for one trace or a whole render pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    pub primary_rays: u64,
    /// Primary and reflection queries, shadow rays excluded
    pub intersection_queries: u64,
    pub shadow_queries: u64,
    pub bounces: u64,
}

impl Add for TraceStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            primary_rays: self.primary_rays + other.primary_rays,
            intersection_queries: self.intersection_queries + other.intersection_queries,
            shadow_queries: self.shadow_queries + other.shadow_queries,
            bounces: self.bounces + other.bounces,
        }
    }
}

impl AddAssign for TraceStats {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// Color of one trace together with what it cost
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceOutput {
    /// RGB plus alpha, alpha is always 1
    pub color: Vector4<f32>,
    pub stats: TraceStats,
    /// Specular weight left when the bounce loop stopped (zero on a primary miss)
    pub weight: Color,
}

/// Final color for a primary ray
pub fn trace(scene: &Scene, ray: &Ray) -> Vector4<f32> {
    trace_with_stats(scene, ray).color
}

/// Trace a primary ray and report the queries it issued
pub fn trace_with_stats(scene: &Scene, ray: &Ray) -> TraceOutput {
    let mut stats = TraceStats {
        primary_rays: 1,
        intersection_queries: 1,
        ..TraceStats::default()
    };

    let ray = ray.normalized();
    let Some(mut hit) = intersect(scene, &ray) else {
        return TraceOutput {
            color: opaque(scene.environment.sample(&ray.direction)),
            stats,
            weight: Color::zeros(),
        };
    };

    let mut view = -ray.direction;
    let mut color = shade_counted(
        scene,
        &hit.material,
        &hit.position,
        &hit.normal,
        &view,
        &mut stats,
    );
    let mut k_s = hit.material.k_s;

    for _ in 0..scene.effective_bounce_limit() {
        if k_s.sum() <= 0.0 {
            break;
        }

        let reflected = Ray::new(
            hit.position + hit.normal * T_MIN,
            reflect(&-view, &hit.normal),
        )
        .normalized();
        stats.intersection_queries += 1;
        stats.bounces += 1;

        let Some(next) = intersect(scene, &reflected) else {
            color += k_s.component_mul(&scene.environment.sample(&reflected.direction));
            break;
        };

        view = -reflected.direction;
        let direct = shade_counted(
            scene,
            &next.material,
            &next.position,
            &next.normal,
            &view,
            &mut stats,
        );
        color += k_s.component_mul(&direct);
        hit = next;
        k_s = k_s.component_mul(&hit.material.k_s);
    }

    TraceOutput {
        color: opaque(color),
        stats,
        weight: k_s,
    }
}

fn opaque(color: Color) -> Vector4<f32> {
    Vector4::new(color.x, color.y, color.z, 1.0)
}
