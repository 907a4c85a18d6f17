//! End-to-end workflow on mtcars: split, fit, select, predict, compare.

use ro_core::data::{DataFrame, train_test_split};
use ro_core::datasets::mtcars;
use ro_models::{
    ModelComparison, ModelError, RegressionResult, fit, predict, select_forward,
};

const PREDICTORS: [&str; 10] = [
    "cyl", "disp", "hp", "drat", "wt", "qsec", "vs", "am", "gear", "carb",
];

fn split(seed: u64) -> (DataFrame, DataFrame) {
    mtcars().unwrap().train_test_split(seed, 0.75).unwrap()
}

#[test]
fn test_split_sizes_and_determinism() {
    let first = train_test_split(32, 2024, 0.75).unwrap();
    let second = train_test_split(32, 2024, 0.75).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.train.len(), 24);
    assert_eq!(first.test.len(), 8);

    let (train, test) = split(2024);
    assert_eq!(train.nrows(), 24);
    assert_eq!(test.nrows(), 8);
    assert_eq!(train.record_id(0).unwrap(), mtcars().unwrap().record_id(first.train[0]).unwrap());
}

#[test]
fn test_full_workflow() {
    let (train, test) = split(42);

    let manual = fit(&train, &["wt", "qsec", "am"], "mpg").unwrap();
    let selected = select_forward(&train, "mpg", &PREDICTORS).unwrap();

    assert!(!selected.selected().is_empty());
    assert!(selected.steps.len() <= PREDICTORS.len());
    let mut previous = selected.initial_aic;
    for step in &selected.steps {
        assert!(step.aic < previous);
        previous = step.aic;
    }

    let predictions = predict(&selected.model, &test, Some(0.95)).unwrap();
    assert_eq!(predictions.len(), test.nrows());
    for p in &predictions {
        let (lower, upper) = (p.lower.unwrap(), p.upper.unwrap());
        assert!(lower < p.fit && p.fit < upper);
    }

    let mut comparison = ModelComparison::new(&test, "mpg").unwrap();
    comparison
        .add_model("manual", &manual)
        .unwrap()
        .add_model("forward", &selected.model)
        .unwrap();

    let table = comparison.to_dataframe().unwrap();
    assert_eq!(table.nrows(), 2 * test.nrows());

    let metrics = comparison.metrics();
    assert_eq!(metrics.len(), 2);
    assert!(metrics.iter().all(|m| m.rmse.is_finite() && m.rmse >= 0.0));
    assert_eq!(comparison.residual_summaries().len(), 2);
}

#[test]
fn test_training_residuals_sum_to_zero() {
    let (train, _) = split(7);
    let model = fit(&train, &["wt", "hp"], "mpg").unwrap();

    let predicted = RegressionResult::predict(&model, &train).unwrap();
    let actual = train.column_f64("mpg").unwrap();
    let residual_sum: f64 = (&actual - &predicted).sum();

    assert!(residual_sum.abs() < 1e-9);
}

#[test]
fn test_tiny_training_set_is_insufficient() {
    let small = mtcars().unwrap().take(&[0, 1, 2, 3, 4]).unwrap();
    let (train, test) = small.train_test_split(3, 0.8).unwrap();
    assert_eq!((train.nrows(), test.nrows()), (4, 1));

    let err = fit(&train, &["wt", "hp", "qsec", "drat"], "mpg").unwrap_err();
    assert!(matches!(err, ModelError::InsufficientData { .. }));
}
