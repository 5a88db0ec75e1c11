//! Direct Blinn-Phong illumination with binary shadow rays

use nalgebra::{Point3, Vector3};

use crate::integrator::TraceStats;
use crate::intersect::intersect;
use crate::math::{Color, Ray};
use crate::scene::{Material, Scene};
use crate::T_MIN;

/// Direct-lit color at a surface point, summed over every unoccluded light
///
/// `view` points from the surface toward the viewer. No ambient, reflection
/// or environment term is included.
pub fn shade(
    scene: &Scene,
    material: &Material,
    position: &Point3<f32>,
    normal: &Vector3<f32>,
    view: &Vector3<f32>,
) -> Color {
    shade_counted(scene, material, position, normal, view, &mut TraceStats::default())
}

pub(crate) fn shade_counted(
    scene: &Scene,
    material: &Material,
    position: &Point3<f32>,
    normal: &Vector3<f32>,
    view: &Vector3<f32>,
    stats: &mut TraceStats,
) -> Color {
    let mut color = Color::zeros();
    let shadow_origin = position + normal * T_MIN;

    for light in &scene.lights {
        let to_light = light.position - position;
        let l = to_light.normalize();

        // Shadow hits are measured from the offset origin along a unit direction,
        // so compare against the distance from that same origin.
        let light_dist = (light.position - shadow_origin).norm();
        stats.shadow_queries += 1;
        let occluded = intersect(scene, &Ray::new(shadow_origin, l))
            .is_some_and(|hit| hit.t < light_dist);
        if occluded {
            continue;
        }

        let cos_theta = normal.dot(&l).max(0.0);
        color += material.k_d.component_mul(&light.intensity) * cos_theta;

        if cos_theta > 0.0 {
            if let Some(h) = (l + view).try_normalize(f32::EPSILON) {
                let cos_phi = normal.dot(&h).max(0.0);
                if cos_phi > 0.0 {
                    color += material.k_s.component_mul(&light.intensity)
                        * cos_phi.powf(material.shininess);
                }
            }
        }
    }

    color
}
