//! Environment samplers used when a ray leaves the scene

use image::Rgb32FImage;
use nalgebra::Vector3;
use std::path::Path;

use crate::math::Color;

/// Total mapping from a unit direction to a background color
pub trait Environment: Send + Sync {
    /// Color seen along `direction`
    fn sample(&self, direction: &Vector3<f32>) -> Color;

    /// Name of the sampler, for logs
    fn name(&self) -> &str;
}

impl<F> Environment for F
where
    F: Fn(&Vector3<f32>) -> Color + Send + Sync,
{
    fn sample(&self, direction: &Vector3<f32>) -> Color {
        self(direction)
    }

    fn name(&self) -> &str {
        "closure"
    }
}

/// Same color in every direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(pub Color);

impl Constant {
    pub fn black() -> Self {
        Self(Color::zeros())
    }
}

impl Environment for Constant {
    fn sample(&self, _direction: &Vector3<f32>) -> Color {
        self.0
    }

    fn name(&self) -> &str {
        "constant"
    }
}

/// Procedural sky blending from the horizon color (looking down) to the zenith color (looking up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub horizon: Color,
    pub zenith: Color,
}

impl Gradient {
    pub fn new(horizon: Color, zenith: Color) -> Self {
        Self { horizon, zenith }
    }
}

impl Environment for Gradient {
    fn sample(&self, direction: &Vector3<f32>) -> Color {
        let t = (0.5 * (direction.y + 1.0)).clamp(0.0, 1.0);
        self.horizon * (1.0 - t) + self.zenith * t
    }

    fn name(&self) -> &str {
        "gradient"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EnvironmentError {
    #[error("Failed to load cube map face: {0}")]
    Image(#[from] image::ImageError),

    #[error("Cube map face {face} is {width}x{height}, expected a square {expected}x{expected} face")]
    FaceSize {
        face: usize,
        width: u32,
        height: u32,
        expected: u32,
    },
}

/// Six-face environment texture
///
/// Faces are ordered +X, -X, +Y, -Y, +Z, -Z and addressed with the usual
/// OpenGL cube map conventions. Lookup is nearest texel.
#[derive(Debug, Clone)]
pub struct CubeMap {
    faces: [Rgb32FImage; 6],
    size: u32,
    swap_yz: bool,
}

impl CubeMap {
    /// Build a cube map from decoded faces; all faces must be square and the same size
    pub fn from_faces(faces: [Rgb32FImage; 6], swap_yz: bool) -> Result<Self, EnvironmentError> {
        let expected = faces[0].width();
        for (face, img) in faces.iter().enumerate() {
            if img.width() != expected || img.height() != expected || expected == 0 {
                return Err(EnvironmentError::FaceSize {
                    face,
                    width: img.width(),
                    height: img.height(),
                    expected,
                });
            }
        }

        Ok(Self {
            faces,
            size: expected,
            swap_yz,
        })
    }

    /// Load faces from image files in +X, -X, +Y, -Y, +Z, -Z order
    pub fn load<P: AsRef<Path>>(paths: &[P; 6], swap_yz: bool) -> Result<Self, EnvironmentError> {
        let [px, nx, py, ny, pz, nz] = paths;
        let faces = [
            load_face(px.as_ref())?,
            load_face(nx.as_ref())?,
            load_face(py.as_ref())?,
            load_face(ny.as_ref())?,
            load_face(pz.as_ref())?,
            load_face(nz.as_ref())?,
        ];
        Self::from_faces(faces, swap_yz)
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Face index and (s, t) face coordinates in [0, 1] for a direction
    fn face_coords(d: &Vector3<f32>) -> Option<(usize, f32, f32)> {
        let (ax, ay, az) = (d.x.abs(), d.y.abs(), d.z.abs());

        let (face, sc, tc, ma) = if ax >= ay && ax >= az {
            if d.x > 0.0 {
                (0, -d.z, -d.y, ax)
            } else {
                (1, d.z, -d.y, ax)
            }
        } else if ay >= az {
            if d.y > 0.0 {
                (2, d.x, d.z, ay)
            } else {
                (3, d.x, -d.z, ay)
            }
        } else if d.z > 0.0 {
            (4, d.x, -d.y, az)
        } else {
            (5, -d.x, -d.y, az)
        };

        if ma <= 0.0 || !ma.is_finite() {
            return None;
        }

        Some((face, 0.5 * (sc / ma + 1.0), 0.5 * (tc / ma + 1.0)))
    }
}

fn load_face(path: &Path) -> Result<Rgb32FImage, EnvironmentError> {
    tracing::debug!(path = %path.display(), "Loading cube map face");
    Ok(image::open(path)?.to_rgb32f())
}

impl Environment for CubeMap {
    fn sample(&self, direction: &Vector3<f32>) -> Color {
        let d = if self.swap_yz {
            Vector3::new(direction.x, direction.z, direction.y)
        } else {
            *direction
        };

        let Some((face, s, t)) = Self::face_coords(&d) else {
            return Color::zeros();
        };

        let max = self.size - 1;
        let x = ((s * self.size as f32) as u32).min(max);
        let y = ((t * self.size as f32) as u32).min(max);
        let texel = self.faces[face].get_pixel(x, y);
        Color::new(texel[0], texel[1], texel[2])
    }

    fn name(&self) -> &str {
        "cubemap"
    }
}
