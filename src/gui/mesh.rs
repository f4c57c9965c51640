use kiss3d::resource::Mesh;
use nalgebra::{Point3, Vector3};

/// Tessellation resolution for a sphere of the given radius.
///
/// Tracks the radius the way the classic quadric spheres did, so the gas
/// giants stay round up close while the little moons stay cheap. The floor
/// keeps tiny bodies from going polygonal; the cap keeps the vertex count
/// comfortably inside u16 index range.
pub fn segment_count(radius: f32) -> usize {
    ((radius * 6.0) as usize).clamp(8, 64)
}

/// Builds a UV sphere of the given radius, centered at the origin.
pub fn uv_sphere(radius: f32) -> Mesh {
    let segments = segment_count(radius);
    let (coords, faces, normals) = sphere_arrays(radius, segments);
    Mesh::new(coords, faces, Some(normals), None, false)
}

fn sphere_arrays(
    radius: f32,
    segments: usize,
) -> (Vec<Point3<f32>>, Vec<Point3<u16>>, Vec<Vector3<f32>>) {
    use std::f32::consts::{PI, TAU};

    // One extra row/column so the seam and the poles get their own vertices.
    let rows = segments + 1;
    let mut coords = Vec::with_capacity(rows * rows);
    let mut normals = Vec::with_capacity(rows * rows);
    for i in 0..rows {
        let phi = PI * (i as f32) / (segments as f32);
        for j in 0..rows {
            let theta = TAU * (j as f32) / (segments as f32);
            let normal = Vector3::new(
                phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            );
            coords.push(Point3::from(radius * normal));
            normals.push(normal);
        }
    }

    let index = |i: usize, j: usize| (i * rows + j) as u16;
    let mut faces = Vec::with_capacity(2 * segments * segments);
    for i in 0..segments {
        for j in 0..segments {
            // Wound counterclockwise seen from outside
            faces.push(Point3::new(index(i, j), index(i + 1, j + 1), index(i + 1, j)));
            faces.push(Point3::new(index(i, j), index(i, j + 1), index(i + 1, j + 1)));
        }
    }

    (coords, faces, normals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_count_tracks_radius() {
        assert_eq!(segment_count(3.0), 18);
        assert_eq!(segment_count(10.35), 62);
    }

    #[test]
    fn test_segment_count_clamps() {
        assert_eq!(segment_count(1.2), 8);
        assert_eq!(segment_count(45.0), 64);
    }

    #[test]
    fn test_vertices_sit_on_the_sphere() {
        let (coords, _, normals) = sphere_arrays(7.5, 12);
        assert_eq!(coords.len(), 13 * 13);
        for (coord, normal) in coords.iter().zip(&normals) {
            approx::assert_relative_eq!(coord.coords.norm(), 7.5, epsilon = 1e-4);
            approx::assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_faces_index_real_vertices() {
        let (coords, faces, _) = sphere_arrays(3.0, 18);
        assert_eq!(faces.len(), 2 * 18 * 18);
        for face in &faces {
            assert!((face.x as usize) < coords.len());
            assert!((face.y as usize) < coords.len());
            assert!((face.z as usize) < coords.len());
        }
    }

    #[test]
    fn test_faces_wind_outward() {
        let (coords, faces, _) = sphere_arrays(5.0, 10);
        for face in &faces {
            let a = coords[face.x as usize];
            let b = coords[face.y as usize];
            let c = coords[face.z as usize];
            let outward = (b - a).cross(&(c - a));
            // Pole rows produce a few degenerate triangles; those get a zero
            // normal and are fine either way.
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            assert!(outward.dot(&centroid) >= -1e-4);
        }
    }
}
