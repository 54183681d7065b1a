use approx::assert_abs_diff_eq;
use distviz::catalog::Family;
use distviz::fitting::negative_log_likelihood;
use distviz::ParameterVector;
use rand::SeedableRng;
use rand_distr::Distribution;

fn draw<D: Distribution<f64>>(distr: &D, n: usize, seed: u64) -> Vec<f64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..n).map(|_| distr.sample(&mut rng)).collect()
}

fn fitted(family: Family, samples: &[f64]) -> ParameterVector {
    ParameterVector::from_tuple(family, &family.fit(samples).unwrap()).unwrap()
}

#[test]
fn normal_fit_converges() {
    let distr = rand_distr::Normal::new(2.0, 1.5).unwrap();
    let small = fitted(Family::Normal, &draw(&distr, 50, 1));
    let large = fitted(Family::Normal, &draw(&distr, 20_000, 1));
    assert_abs_diff_eq!(large.loc(), 2.0, epsilon = 0.05);
    assert_abs_diff_eq!(large.scale(), 1.5, epsilon = 0.05);
    let error = |p: &ParameterVector| (p.loc() - 2.0).abs() + (p.scale() - 1.5).abs();
    assert!(error(&large) < error(&small) + 0.02);
}

#[test]
fn exponential_fit_converges() {
    let distr = rand_distr::Exp::new(0.5).unwrap();
    let samples: Vec<f64> = draw(&distr, 20_000, 2).into_iter().map(|x| x + 1.0).collect();
    let params = fitted(Family::Exponential, &samples);
    assert_abs_diff_eq!(params.loc(), 1.0, epsilon = 0.01);
    assert_abs_diff_eq!(params.scale(), 2.0, epsilon = 0.1);
}

#[test]
fn uniform_fit_converges() {
    let distr = rand_distr::Uniform::new(-1.0, 3.0);
    let params = fitted(Family::Uniform, &draw(&distr, 20_000, 3));
    assert_abs_diff_eq!(params.loc(), -1.0, epsilon = 0.01);
    assert_abs_diff_eq!(params.scale(), 4.0, epsilon = 0.02);
}

#[test]
fn laplace_fit_converges() {
    // Difference of two exponentials with the same rate is Laplace distributed.
    let exp = rand_distr::Exp::new(1.0).unwrap();
    let left = draw(&exp, 20_000, 4);
    let right = draw(&exp, 20_000, 5);
    let samples: Vec<f64> = left.iter().zip(&right).map(|(a, b)| 0.5 + a - b).collect();
    let params = fitted(Family::Laplace, &samples);
    assert_abs_diff_eq!(params.loc(), 0.5, epsilon = 0.05);
    assert_abs_diff_eq!(params.scale(), 1.0, epsilon = 0.05);
}

/// A known distribution, the sample drawn from it, and how far each fitted parameter may stray.
struct Case {
    family: Family,
    samples: Vec<f64>,
    truth: Vec<f64>,
    tolerance: Vec<f64>,
}

fn likelihood_cases() -> Vec<Case> {
    const N: usize = 20_000;
    let pareto = |b: f64, loc: f64, scale: f64, seed: u64| -> Vec<f64> {
        draw(&rand_distr::Pareto::new(1.0, b).unwrap(), N, seed)
            .into_iter()
            .map(|x| loc + scale * x)
            .collect()
    };
    vec![
        Case {
            family: Family::Gamma,
            samples: draw(&rand_distr::Gamma::new(3.0, 1.5).unwrap(), N, 6),
            truth: vec![3.0, 0.0, 1.5],
            tolerance: vec![0.4, 0.25, 0.15],
        },
        Case {
            family: Family::Weibull,
            samples: draw(&rand_distr::Weibull::new(2.0, 3.0).unwrap(), N, 7),
            truth: vec![3.0, 0.0, 2.0],
            tolerance: vec![0.3, 0.15, 0.15],
        },
        Case {
            family: Family::Lognormal,
            samples: draw(&rand_distr::LogNormal::new(0.0, 0.5).unwrap(), N, 8),
            truth: vec![0.5, 0.0, 1.0],
            tolerance: vec![0.05, 0.05, 0.05],
        },
        Case {
            family: Family::Beta,
            samples: draw(&rand_distr::Beta::new(2.0, 5.0).unwrap(), N, 9),
            truth: vec![2.0, 5.0, 0.0, 1.0],
            tolerance: vec![0.25, 0.75, 0.02, 0.06],
        },
        Case {
            family: Family::Triangular,
            samples: draw(&rand_distr::Triangular::new(0.0, 1.0, 0.3).unwrap(), N, 10),
            truth: vec![0.3, 0.0, 1.0],
            tolerance: vec![0.03, 0.02, 0.02],
        },
        Case {
            family: Family::ChiSquare,
            samples: draw(&rand_distr::ChiSquared::new(4.0).unwrap(), N, 11),
            truth: vec![4.0, 0.0, 1.0],
            tolerance: vec![0.5, 0.25, 0.12],
        },
        Case {
            family: Family::Pareto,
            samples: pareto(3.0, 0.0, 1.0, 12),
            truth: vec![3.0, 0.0, 1.0],
            tolerance: vec![0.25, 0.1, 0.1],
        },
        Case {
            family: Family::Pareto,
            samples: pareto(1.5, -3.0, 2.0, 13),
            truth: vec![1.5, -3.0, 2.0],
            tolerance: vec![0.15, 0.2, 0.2],
        },
    ]
}

#[test]
fn likelihood_fits_converge_to_the_generating_parameters() {
    for case in likelihood_cases() {
        let family = case.family;
        let params = fitted(family, &case.samples);
        for (i, ((got, want), tolerance)) in params
            .to_vec()
            .iter()
            .zip(&case.truth)
            .zip(&case.tolerance)
            .enumerate()
        {
            assert!(
                (got - want).abs() <= *tolerance,
                "{family} parameter {i}: fitted {got}, generated with {want}"
            );
        }
    }
}

#[test]
fn likelihood_fits_beat_the_generating_parameters() {
    for case in likelihood_cases() {
        let family = case.family;
        let truth = ParameterVector::from_tuple(family, &case.truth).unwrap();
        let truth_nll = negative_log_likelihood(family, &truth, &case.samples);
        assert!(truth_nll.is_finite(), "{family}");
        let params = fitted(family, &case.samples);
        let fitted_nll = negative_log_likelihood(family, &params, &case.samples);
        assert!(fitted_nll <= truth_nll + 1e-3, "{family}: {fitted_nll} vs {truth_nll}");
    }
}

#[test]
fn pareto_fit_places_the_support_edge_at_the_smallest_observation() {
    let samples: Vec<f64> = draw(&rand_distr::Pareto::new(1.0, 3.0).unwrap(), 20_000, 12);
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let params = fitted(Family::Pareto, &samples);
    assert_abs_diff_eq!(params.loc() + params.scale(), min, epsilon = 1e-9);
    assert_abs_diff_eq!(min, 1.0, epsilon = 0.01);
}
