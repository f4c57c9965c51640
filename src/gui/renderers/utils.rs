use nalgebra::Point3;

pub fn path_iter_parametric<F, S>(
    f: F,
    t_start: S,
    t_end: S,
    num_segments: usize,
) -> impl Iterator<Item = Point3<f32>>
where
    F: Fn(S) -> Point3<f32>,
    S: nalgebra::RealField + simba::scalar::SupersetOf<usize> + Copy,
{
    assert!(
        num_segments >= 1,
        "Must have at least one segment, num_segments was {}",
        num_segments
    );
    let convert = nalgebra::convert::<usize, S>;
    (0..=num_segments)
        .map(move |i| convert(i) / convert(num_segments))
        // u ranges from 0 to 1 (inclusive)
        .map(move |u| t_start + u * (t_end - t_start))
        .map(f)
}

/// Closed circle of the given radius in the xy-plane, traced
/// counterclockwise. The first and last points coincide, so feeding this
/// into a segment path yields a closed loop.
pub fn circle_iter(radius: f32, num_segments: usize) -> impl Iterator<Item = Point3<f32>> {
    path_iter_parametric(
        move |theta: f32| Point3::new(radius * theta.cos(), radius * theta.sin(), 0.0),
        0.0,
        std::f32::consts::TAU,
        num_segments,
    )
}
