//! Frame assembly: one primary ray per pixel, fanned out across threads
//!
//! Each pixel is an independent call into the integrator against a shared,
//! read-only scene. The framebuffer keeps unclamped linear color; clamping
//! happens only when converting for display.

use image::{Rgba, RgbaImage};
use nalgebra::Vector4;
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;

use crate::camera::Camera;
use crate::integrator::{trace_with_stats, TraceStats};
use crate::scene::Scene;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// The frame renderer
pub struct Renderer {
    width: usize,
    height: usize,
    /// Width of one pixel relative to its height (0.5 for terminal cells)
    pixel_aspect: f32,
    framebuffer: Vec<Vector4<f32>>,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixel_aspect: 1.0,
            framebuffer: vec![Vector4::zeros(); width * height],
        }
    }

    /// Renderer for terminal output, where character cells are about twice as tall as wide
    pub fn for_terminal(width: usize, height: usize) -> Self {
        Self {
            pixel_aspect: 0.5,
            ..Self::new(width, height)
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.framebuffer = vec![Vector4::zeros(); width * height];
    }

    /// Linear RGBA at a pixel, row 0 at the top
    pub fn pixel(&self, x: usize, y: usize) -> Option<Vector4<f32>> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.framebuffer[y * self.width + x])
    }

    /// Render the scene to the framebuffer (parallel over rows)
    pub fn render(&mut self, scene: &Scene, camera: &Camera) -> TraceStats {
        let width = self.width;
        let height = self.height;
        if width == 0 || height == 0 {
            tracing::warn!(width, height, "Empty framebuffer, nothing to render");
            return TraceStats::default();
        }

        let mut camera = *camera;
        camera.set_aspect_ratio((width as f32 / height as f32) * self.pixel_aspect);

        let started = Instant::now();
        let stats = self
            .framebuffer
            .par_chunks_mut(width)
            .enumerate()
            .map(|(y, row)| {
                let mut row_stats = TraceStats::default();
                let sy = 1.0 - 2.0 * ((y as f32 + 0.5) / height as f32);
                for (x, pixel) in row.iter_mut().enumerate() {
                    let sx = 2.0 * ((x as f32 + 0.5) / width as f32) - 1.0;
                    let out = trace_with_stats(scene, &camera.ray_through(sx, sy));
                    *pixel = out.color;
                    row_stats += out.stats;
                }
                row_stats
            })
            .reduce(TraceStats::default, |a, b| a + b);

        tracing::info!(
            width,
            height,
            primary_rays = stats.primary_rays,
            intersection_queries = stats.intersection_queries,
            shadow_queries = stats.shadow_queries,
            bounces = stats.bounces,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Render pass complete"
        );

        stats
    }

    /// Convert the framebuffer to 8-bit RGBA, clamping each channel to [0, 1]
    pub fn to_image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width as u32, self.height as u32);
        for (i, color) in self.framebuffer.iter().enumerate() {
            let x = (i % self.width) as u32;
            let y = (i / self.width) as u32;
            img.put_pixel(x, y, Rgba(to_rgba8(color)));
        }
        img
    }

    /// Write the framebuffer as a PNG
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        let path = path.as_ref();
        self.to_image().save(path)?;
        tracing::info!(path = %path.display(), "Wrote image");
        Ok(())
    }

    /// Convert framebuffer to ASCII string (grayscale)
    pub fn to_ascii(&self) -> String {
        let gradient_chars: Vec<char> = crate::ASCII_GRADIENT.chars().collect();
        let mut result = String::with_capacity(self.width * self.height + self.height);

        for row in self.framebuffer.chunks(self.width.max(1)) {
            for color in row {
                let luminance = (0.299 * color.x + 0.587 * color.y + 0.114 * color.z).clamp(0.0, 1.0);
                let index = ((luminance * (gradient_chars.len() - 1) as f32).round() as usize)
                    .min(gradient_chars.len() - 1);
                result.push(gradient_chars[index]);
            }
            result.push('\n');
        }

        result
    }
}

fn to_rgba8(color: &Vector4<f32>) -> [u8; 4] {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(color.x), channel(color.y), channel(color.z), channel(color.w)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Constant;
    use crate::math::Color;
    use crate::scene::{Light, Material, Sphere};
    use nalgebra::Point3;
    use std::sync::Arc;

    fn red_ball_scene() -> Scene {
        Scene::new(Arc::new(Constant(Color::new(0.0, 0.0, 0.5))))
            .with_sphere(Sphere::new(
                Point3::origin(),
                1.0,
                Material::diffuse(Color::new(1.0, 0.0, 0.0)),
            ))
            .with_light(Light::new(Point3::new(0.0, 0.0, 5.0), Color::new(1.0, 1.0, 1.0)))
    }

    fn front_camera() -> Camera {
        Camera::new(Point3::new(0.0, 0.0, 5.0), Point3::origin(), 40.0, 1.0)
    }

    #[test]
    fn test_renderer_creation() {
        let renderer = Renderer::new(80, 24);
        assert_eq!(renderer.width(), 80);
        assert_eq!(renderer.height(), 24);
        assert_eq!(renderer.framebuffer.len(), 80 * 24);
    }

    #[test]
    fn test_renderer_resize() {
        let mut renderer = Renderer::new(80, 24);
        renderer.resize(100, 30);
        assert_eq!(renderer.width(), 100);
        assert_eq!(renderer.height(), 30);
        assert_eq!(renderer.framebuffer.len(), 3000);
    }

    #[test]
    fn test_render_center_hits_and_corner_misses() {
        let mut renderer = Renderer::new(21, 21);
        renderer.render(&red_ball_scene(), &front_camera());

        let center = renderer.pixel(10, 10).unwrap();
        assert!(center.x > 0.9 && center.y < 1e-6 && center.z < 1e-6);
        assert_eq!(center.w, 1.0);

        let corner = renderer.pixel(0, 0).unwrap();
        assert!((corner - Vector4::new(0.0, 0.0, 0.5, 1.0)).norm() < 1e-6);
        assert!(renderer.pixel(21, 0).is_none());
    }

    #[test]
    fn test_render_stats_cover_every_pixel() {
        let mut renderer = Renderer::new(16, 9);
        let stats = renderer.render(&red_ball_scene(), &front_camera());
        assert_eq!(stats.primary_rays, 16 * 9);
        assert_eq!(stats.intersection_queries, 16 * 9);
        assert!(stats.shadow_queries > 0 && stats.shadow_queries < 16 * 9);
        assert_eq!(stats.bounces, 0);
    }

    #[test]
    fn test_render_empty_framebuffer() {
        let mut renderer = Renderer::new(0, 10);
        let stats = renderer.render(&red_ball_scene(), &front_camera());
        assert_eq!(stats, TraceStats::default());
        assert!(renderer.to_ascii().is_empty());
    }

    #[test]
    fn test_to_image_clamps() {
        let mut renderer = Renderer::new(2, 1);
        renderer.framebuffer[0] = Vector4::new(2.0, -1.0, 0.5, 1.0);
        let img = renderer.to_image();
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 128, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_save_png() {
        let mut renderer = Renderer::new(8, 8);
        renderer.render(&red_ball_scene(), &front_camera());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        renderer.save(&path).unwrap();
        let loaded = image::open(&path).unwrap();
        assert_eq!(loaded.to_rgba8().dimensions(), (8, 8));
    }

    #[test]
    fn test_to_ascii_shape() {
        let mut renderer = Renderer::for_terminal(20, 10);
        renderer.render(&red_ball_scene(), &front_camera());
        let ascii = renderer.to_ascii();
        assert_eq!(ascii.lines().count(), 10);
        assert!(ascii.lines().all(|l| l.chars().count() == 20));
        // Lit ball in the middle is brighter than the blue background at the edge
        let middle: Vec<char> = ascii.lines().nth(5).unwrap().chars().collect();
        let rank = |c: char| crate::ASCII_GRADIENT.chars().position(|g| g == c).unwrap();
        assert!(rank(middle[10]) > rank(middle[0]));
    }
}
