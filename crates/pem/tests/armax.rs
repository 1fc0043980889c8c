//! ARMAX estimation.

mod common;

use rand::SeedableRng;
use rand::rngs::StdRng;
use sysid_pem::{ModelSpec, Structure, armax};

use common::{assert_in_ellipsoid, gaussian, simulate, uniform_inputs};

#[test]
fn siso() {
    let n = 1000;
    let mut rng = StdRng::seed_from_u64(21);
    let u = uniform_inputs(&mut rng, n, 1);
    let e = gaussian(&mut rng, n, 1, 0.01);
    let y = simulate(
        &[vec![vec![1.0, -1.2, 0.36]]],
        &[vec![vec![0.0, 0.5, 0.1]]],
        &[vec![1.0, 0.8, -0.1]],
        &u,
        &e,
    );

    let model = armax(2, 1, 2, 1, &u, &y).unwrap();
    let theta0 = [-1.2, 0.36, 0.5, 0.1, 0.8, -0.1];
    assert_eq!(model.structure(), Structure::Armax);
    assert!(model.converged(), "{:?}", model.status());
    assert!(model.status()[0].iterations > 1);
    assert_in_ellipsoid(&model, &theta0);
    assert!(model.c()[(0, 0)].is_stable());
}

#[test]
fn miso_with_shared_noise() {
    let n = 1000;
    let mut rng = StdRng::seed_from_u64(23);
    let u = uniform_inputs(&mut rng, n, 2);
    let e = gaussian(&mut rng, n, 1, 0.01);
    let y = simulate(
        &[vec![vec![1.0, -1.2, 0.36]]],
        &[vec![vec![0.0, 0.5, 0.1], vec![0.0, 0.3, -0.2]]],
        &[vec![1.0, 0.8, -0.1]],
        &u,
        &e,
    );

    let model = armax(2, [1, 1], 2, 1, &u, &y).unwrap();
    let theta0 = [-1.2, 0.36, 0.5, 0.1, 0.3, -0.2, 0.8, -0.1];
    assert_eq!(model.n_params(), 8);
    assert!(model.converged(), "{:?}", model.status());
    assert_in_ellipsoid(&model, &theta0);
}

#[test]
fn simo() {
    let n = 1000;
    let mut rng = StdRng::seed_from_u64(24);
    let u = uniform_inputs(&mut rng, n, 1);
    let e = gaussian(&mut rng, n, 2, 0.01);
    let a = [
        vec![vec![1.0, -1.2, 0.36], vec![0.0]],
        vec![vec![0.0], vec![1.0, -1.4, 0.49]],
    ];
    let b = [vec![vec![0.0, 0.5, 0.1]], vec![vec![0.0, 0.8, 0.3]]];
    let c = [vec![1.0, 0.8, -0.1], vec![1.0, 0.5, -0.2]];
    let y = simulate(&a, &b, &c, &u, &e);

    let model = ModelSpec::armax([[2, 0], [0, 2]], [[1], [1]], [2, 2], 1)
        .fit(&u, &y)
        .unwrap();
    let theta0 = [
        -1.2, 0.36, 0.5, 0.1, 0.8, -0.1, //
        -1.4, 0.49, 0.8, 0.3, 0.5, -0.2,
    ];
    assert_eq!(model.n_params(), 12);
    assert_eq!(model.status().len(), 2);
    assert!(model.converged(), "{:?}", model.status());
    assert_in_ellipsoid(&model, &theta0);
    for j in 0..2 {
        assert!(model.c()[(j, 0)].is_stable());
    }
}

#[test]
fn mimo() {
    let n = 1000;
    let mut rng = StdRng::seed_from_u64(22);
    let u = uniform_inputs(&mut rng, n, 2);
    let e = gaussian(&mut rng, n, 2, 0.01);
    let a = [
        vec![vec![1.0, -1.2, 0.36], vec![0.0, -0.2, 0.1]],
        vec![vec![0.0, -0.05, 0.09], vec![1.0, -1.4, 0.49]],
    ];
    let b = [
        vec![vec![0.0, 0.5, 0.1], vec![0.0, 1.0, 0.66]],
        vec![vec![0.0, 0.8, 0.3], vec![0.0, 0.65, 0.2]],
    ];
    let c = [vec![1.0, 0.8, -0.1], vec![1.0, 0.5, -0.2]];
    let y = simulate(&a, &b, &c, &u, &e);

    let model = ModelSpec::armax([[2, 2], [2, 2]], [[1, 1], [1, 1]], [2, 2], 1)
        .fit(&u, &y)
        .unwrap();
    let theta0 = [
        -1.2, 0.36, -0.2, 0.1, 0.5, 0.1, 1.0, 0.66, 0.8, -0.1, //
        -0.05, 0.09, -1.4, 0.49, 0.8, 0.3, 0.65, 0.2, 0.5, -0.2,
    ];
    assert_eq!(model.n_params(), 20);
    assert_eq!(model.c().rows(), 2);
    assert!(model.converged(), "{:?}", model.status());
    assert_in_ellipsoid(&model, &theta0);
}
