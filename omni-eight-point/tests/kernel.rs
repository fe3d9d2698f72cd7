use omni_core::{
    nalgebra::{Point3, Rotation3, UnitVector3, Vector3},
    sample_consensus::Model,
    CameraPoint, CameraToCamera, Error, ErrorMetric, FeatureMatch, Kernel, Pose, Projective,
};
use omni_eight_point::essential_kernel;
use omni_equirect::AngularError;
use rand::{seq::index::sample, Rng, SeedableRng};
use rand_pcg::Pcg64;

const INLIERS: usize = 24;
const OUTLIERS: usize = 8;
const THRESHOLD: f64 = 1e-6;

fn pose() -> CameraToCamera {
    CameraToCamera::from_parts(
        Vector3::new(0.6, 0.1, -0.3),
        Rotation3::from_euler_angles(0.1, -0.4, 0.2),
    )
}

/// Inliers come first, followed by outliers whose second bearing is random.
fn bearings(rng: &mut Pcg64) -> (Vec<UnitVector3<f64>>, Vec<UnitVector3<f64>>) {
    let pose = pose();
    let mut random_bearing = || {
        UnitVector3::new_normalize(Vector3::new(
            rng.gen_range(-1.0f64..1.0),
            rng.gen_range(-1.0f64..1.0),
            rng.gen_range(-1.0f64..1.0),
        ))
    };
    let mut a = vec![];
    let mut b = vec![];
    for _ in 0..INLIERS {
        let point = CameraPoint::from_point(Point3::from(random_bearing().into_inner() * 3.0));
        a.push(point.bearing());
        b.push(pose.transform(point).bearing());
    }
    for _ in 0..OUTLIERS {
        a.push(random_bearing());
        b.push(random_bearing());
    }
    (a, b)
}

#[test]
fn fit_only_uses_selected_indices() {
    let mut rng = Pcg64::seed_from_u64(0);
    let (a, b) = bearings(&mut rng);
    let kernel = essential_kernel(&a, &b).unwrap();
    assert_eq!(kernel.len(), INLIERS + OUTLIERS);
    assert_eq!(kernel.min_samples(), 8);
    assert_eq!(kernel.max_models(), 1);

    // The last eight inliers are selected out of order; a fit touching any outlier would not
    // explain every inlier.
    let samples = [23, 17, 20, 16, 22, 18, 21, 19];
    let models = kernel.fit(&samples);
    assert_eq!(models.len(), 1);
    let model = &models[0];
    for ix in 0..INLIERS {
        assert!(kernel.error(model, ix) < THRESHOLD);
    }
}

#[test]
fn error_matches_metric() {
    let mut rng = Pcg64::seed_from_u64(1);
    let (a, b) = bearings(&mut rng);
    let kernel = essential_kernel(&a, &b).unwrap();
    let model = kernel.fit(&(0..8).collect::<Vec<_>>())[0];
    for ix in 0..kernel.len() {
        let expected = AngularError.error(&model, &FeatureMatch(a[ix], b[ix]));
        assert_eq!(kernel.error(&model, ix), expected);
        assert_eq!(model.residual(&kernel.data()[ix]), expected);
    }
}

#[test]
fn fit_and_error_from_many_threads() {
    let mut rng = Pcg64::seed_from_u64(2);
    let (a, b) = bearings(&mut rng);
    let kernel = essential_kernel(&a, &b).unwrap();
    let kernel = &kernel;
    std::thread::scope(|scope| {
        let handles = (0..4)
            .map(|offset| {
                scope.spawn(move || {
                    let samples = (offset..offset + 8).collect::<Vec<_>>();
                    let model = kernel.fit(&samples)[0];
                    (0..INLIERS).all(|ix| kernel.error(&model, ix) < THRESHOLD)
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    });
}

/// A minimal consensus loop over the index-based kernel.
#[test]
fn kernel_drives_consensus() {
    let _ = pretty_env_logger::try_init();
    let mut rng = Pcg64::seed_from_u64(3);
    let (a, b) = bearings(&mut rng);
    let kernel = essential_kernel(&a, &b).unwrap();

    let mut best_inliers = vec![];
    for _ in 0..200 {
        let samples = sample(&mut rng, kernel.len(), kernel.min_samples()).into_vec();
        for model in kernel.fit(&samples) {
            let inliers = (0..kernel.len())
                .filter(|&ix| kernel.error(&model, ix) < 1e-3)
                .collect::<Vec<_>>();
            if inliers.len() > best_inliers.len() {
                best_inliers = inliers;
            }
        }
    }
    assert!(best_inliers.len() >= INLIERS);
    assert!((0..INLIERS).all(|ix| best_inliers.contains(&ix)));
}

#[test]
fn mismatched_bearings() {
    let mut rng = Pcg64::seed_from_u64(4);
    let (a, b) = bearings(&mut rng);
    assert!(matches!(
        essential_kernel(&a, &b[..10]),
        Err(Error::MismatchedCorrespondences {
            left: 32,
            right: 10
        })
    ));
    assert!(matches!(
        essential_kernel(&a[..9], &b),
        Err(Error::MismatchedCorrespondences {
            left: 9,
            right: 32
        })
    ));
}

#[test]
#[should_panic]
fn fit_with_seven_samples() {
    let mut rng = Pcg64::seed_from_u64(5);
    let (a, b) = bearings(&mut rng);
    let kernel = essential_kernel(&a, &b).unwrap();
    kernel.fit(&[0, 1, 2, 3, 4, 5, 6]);
}
