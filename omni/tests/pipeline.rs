use log::*;
use omni::{
    camera::equirect::{planar_to_spherical, EquirectangularCamera},
    consensus::Arrsac,
    estimate::{essential_kernel, EightPoint},
    geom::{select_pose, DltTriangulator},
    nalgebra::{Point2, Point3, Rotation3, Vector3},
    CameraModel, CameraPoint, CameraToCamera, Consensus, FeatureMatch, Kernel, Pose, Projective,
    ProjectionMatrix,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

const WIDTH: u32 = 3840;
const HEIGHT: u32 = 1920;
const INLIERS: usize = 60;
const OUTLIERS: usize = 12;

#[test]
fn pixels_to_pose_and_points() {
    let _ = pretty_env_logger::try_init();
    let mut rng = Pcg64::seed_from_u64(42);
    let camera = EquirectangularCamera::new(WIDTH, HEIGHT);
    let pose = CameraToCamera::from_parts(
        Vector3::new(0.8, 0.1, -0.4),
        Rotation3::from_euler_angles(0.05, 0.4, -0.1),
    );

    // Points surround camera A on every side.
    let points = (0..INLIERS)
        .map(|_| {
            let direction = Vector3::new(
                rng.gen_range(-1.0f64..1.0),
                rng.gen_range(-1.0f64..1.0),
                rng.gen_range(-1.0f64..1.0),
            )
            .normalize();
            Point3::from(direction * rng.gen_range(2.0..8.0))
        })
        .collect::<Vec<_>>();

    let mut pixels_a = vec![];
    let mut pixels_b = vec![];
    for &point in &points {
        let point = CameraPoint::from_point(point);
        pixels_a.push(camera.uncalibrate(point.bearing()).unwrap().0);
        pixels_b.push(camera.uncalibrate(pose.transform(point).bearing()).unwrap().0);
    }
    for _ in 0..OUTLIERS {
        let mut pixel = || {
            Point2::new(
                rng.gen_range(0.0..f64::from(WIDTH)),
                rng.gen_range(0.0..f64::from(HEIGHT)),
            )
        };
        pixels_a.push(pixel());
        pixels_b.push(pixel());
    }

    let bearings_a = planar_to_spherical(pixels_a.iter().copied(), WIDTH, HEIGHT);
    let bearings_b = planar_to_spherical(pixels_b.iter().copied(), WIDTH, HEIGHT);
    let kernel = essential_kernel(&bearings_a, &bearings_b).unwrap();

    info!("Running ARRSAC on {} matches", kernel.len());
    let mut arrsac = Arrsac::new(1e-4, Pcg64::from_seed([5; 32]));
    let (essential, inliers) = arrsac
        .model_inliers(&EightPoint::new(), kernel.data().iter().copied())
        .expect("failed to estimate model");
    info!("inliers: {}", inliers.len());
    assert!((0..INLIERS).all(|ix| inliers.contains(&ix)));
    assert!((0..INLIERS).all(|ix| kernel.error(&essential, ix) < 1e-4));

    let inlier_matches = inliers.iter().map(|&ix| kernel.data()[ix]);
    let selected = select_pose(&DltTriangulator::new(), &essential, inlier_matches)
        .expect("no pose agrees with the matches");
    let rotation_residual = (selected.0.rotation.matrix() - pose.0.rotation.matrix()).norm();
    assert!(rotation_residual < 1e-6, "rotation residual: {}", rotation_residual);

    // The reconstruction is only known up to the scale of the translation.
    let scaled = selected.scale(pose.0.translation.vector.norm());
    let translation_residual = (scaled.0.translation.vector - pose.0.translation.vector).norm();
    assert!(translation_residual < 1e-6, "residual: {}", translation_residual);
    let dlt = DltTriangulator::new();
    for (ix, point) in points.iter().enumerate() {
        let FeatureMatch(a, b) = kernel.data()[ix];
        let triangulated = dlt
            .triangulate(&ProjectionMatrix::identity(), a, &scaled.into(), b)
            .unwrap();
        let distance = (triangulated - point.coords).norm();
        assert!(distance < 1e-6 * point.coords.norm(), "distance: {}", distance);
    }
}
