//! Integration tests for the split, estimators and candidate ranking

use ndarray::{Array1, Array2};
use polars::prelude::*;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use realty_regressor::error::RealtyError;
use realty_regressor::source::{ResolvedSchema, SchemaReport};
use realty_regressor::training::{
    train_test_split, Candidate, CandidateSet, EstimatorSpec, LinearRegression, RandomForest,
    RegressionMetrics, RidgeRegression, TrainEngine,
};

fn create_regression_data(n_rows: usize, seed: u64) -> DataFrame {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let bairros = ["Centro", "Norte", "Sul", "Leste"];

    let area: Vec<f64> = (0..n_rows).map(|_| rng.gen_range(30.0..200.0)).collect();
    let vagas: Vec<i64> = (0..n_rows).map(|_| rng.gen_range(0..3)).collect();
    let bairro: Vec<&str> = (0..n_rows).map(|_| bairros[rng.gen_range(0..4)]).collect();
    let preco: Vec<f64> = (0..n_rows)
        .map(|i| {
            let premium = match bairro[i] {
                "Centro" => 1500.0,
                "Norte" => 500.0,
                _ => 0.0,
            };
            6000.0 + 10.0 * area[i] + 400.0 * vagas[i] as f64 + premium + rng.gen::<f64>() * 50.0
        })
        .collect();

    df!(
        "area" => area,
        "vagas" => vagas,
        "bairro" => bairro,
        "preco_m2" => preco
    )
    .unwrap()
}

fn fast_candidates() -> CandidateSet {
    CandidateSet::from_candidates(vec![
        Candidate::new("LinearRegression", EstimatorSpec::LinearRegression),
        Candidate::new("Ridge(alpha=1.0)", EstimatorSpec::Ridge { alpha: 1.0 }),
        Candidate::new(
            "RandomForest(n=30)",
            EstimatorSpec::RandomForest { n_estimators: 30, random_state: 42 },
        ),
    ])
}

#[test]
fn test_split_depends_only_on_row_count_and_seed() {
    let a = train_test_split(250, 0.2, 42).unwrap();
    let b = train_test_split(250, 0.2, 42).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.test.len(), 50);
    assert_eq!(a.train.len(), 200);

    let mut all: Vec<usize> = a.train.iter().chain(a.test.iter()).copied().collect();
    all.sort_unstable();
    assert_eq!(all, (0..250).collect::<Vec<_>>());
}

#[test]
fn test_linear_models_fit_noiseless_plane() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let x = Array2::from_shape_fn((60, 3), |_| rng.gen_range(-5.0..5.0));
    let y: Array1<f64> = x.rows().into_iter().map(|r| 2.0 * r[0] - 3.0 * r[1] + 0.5 * r[2] + 7.0).collect();

    let mut ols = LinearRegression::new();
    ols.fit(&x, &y).unwrap();
    let metrics = RegressionMetrics::compute(&y, &ols.predict(&x).unwrap()).unwrap();
    assert!(metrics.rmse < 1e-6);
    assert!((metrics.r2 - 1.0).abs() < 1e-9);

    let mut ridge = RidgeRegression::new(1.0);
    ridge.fit(&x, &y).unwrap();
    let ridge_metrics = RegressionMetrics::compute(&y, &ridge.predict(&x).unwrap()).unwrap();
    assert!(ridge_metrics.rmse >= metrics.rmse);
    assert!(ridge_metrics.r2 > 0.99);
}

#[test]
fn test_forest_beats_linear_on_step_function() {
    let x = Array2::from_shape_fn((80, 1), |(i, _)| i as f64);
    let y: Array1<f64> = (0..80).map(|i| if (i / 10) % 2 == 0 { 0.0 } else { 100.0 }).collect();

    let mut forest = RandomForest::new_regressor(30).with_random_state(42);
    forest.fit(&x, &y).unwrap();
    let mut ols = LinearRegression::new();
    ols.fit(&x, &y).unwrap();

    let forest_rmse = RegressionMetrics::compute(&y, &forest.predict(&x).unwrap()).unwrap().rmse;
    let ols_rmse = RegressionMetrics::compute(&y, &ols.predict(&x).unwrap()).unwrap().rmse;
    assert!(forest_rmse < ols_rmse);
}

#[test]
fn test_engine_ranking_and_best() {
    let df = create_regression_data(150, 3);
    let schema = SchemaReport::default().resolve_for_training(&df, "preco_m2").unwrap();

    let outcome = TrainEngine::new(fast_candidates()).run(&df, &schema).unwrap();

    assert_eq!(outcome.n_test, 30);
    assert_eq!(outcome.ranking.len(), 3);
    for pair in outcome.ranking.windows(2) {
        assert!(pair[0].rmse <= pair[1].rmse);
    }
    assert_eq!(outcome.best.name(), outcome.ranking[0].name);
    assert!(outcome.ranking.iter().all(|r| r.mae.is_finite() && r.r2.is_finite()));
    // linear signal plus small noise
    assert!(outcome.ranking[0].r2 > 0.95);

    let preds = outcome.best.predict(&df.head(Some(5))).unwrap();
    assert_eq!(preds.len(), 5);
}

#[test]
fn test_engine_is_reproducible() {
    let df = create_regression_data(120, 9);
    let schema = ResolvedSchema {
        target: "preco_m2".to_string(),
        features: vec!["area".to_string(), "vagas".to_string(), "bairro".to_string()],
    };

    let a = TrainEngine::new(fast_candidates()).run(&df, &schema).unwrap();
    let b = TrainEngine::new(fast_candidates()).run(&df, &schema).unwrap();
    assert_eq!(a.ranking, b.ranking);
}

#[test]
fn test_missing_target_rejected_before_fit() {
    let df = create_regression_data(20, 1).drop("preco_m2").unwrap();
    let report = SchemaReport {
        target: Some("preco_m2".to_string()),
        features: None,
    };
    let err = report.resolve_for_training(&df, "preco_m2").unwrap_err();
    assert!(matches!(err, RealtyError::TargetNotFound { .. }));
}

#[test]
fn test_tiny_dataset_cannot_be_split() {
    let df = create_regression_data(1, 1);
    let schema = SchemaReport::default().resolve_for_training(&df, "preco_m2").unwrap();
    assert!(TrainEngine::new(fast_candidates()).run(&df, &schema).is_err());
}
