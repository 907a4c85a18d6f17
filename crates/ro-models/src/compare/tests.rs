use approx::assert_abs_diff_eq;

use super::*;
use crate::lm::{fit, lm};
use ro_core::data::{DataFrameBuilder, SeriesValue};
use ro_core::datasets::mtcars;

/// First 24 cars for training, last 8 for testing
fn train_test() -> (DataFrame, DataFrame) {
    let cars = mtcars().unwrap();
    let train: Vec<usize> = (0..24).collect();
    let test: Vec<usize> = (24..32).collect();
    (cars.take(&train).unwrap(), cars.take(&test).unwrap())
}

#[test]
fn test_rows_are_long_format() {
    let (train, test) = train_test();
    let simple = fit(&train, &["wt"], "mpg").unwrap();
    let full = fit(&train, &["wt", "qsec", "am"], "mpg").unwrap();

    let mut comparison = ModelComparison::new(&test, "mpg").unwrap();
    comparison
        .add_model("simple", &simple)
        .unwrap()
        .add_model("full", &full)
        .unwrap();

    assert_eq!(comparison.model_names(), vec!["simple", "full"]);

    let rows = comparison.rows();
    assert_eq!(rows.len(), 16);
    assert!(rows[..8].iter().all(|r| r.model == "simple"));
    assert!(rows[8..].iter().all(|r| r.model == "full"));
    assert_eq!(rows[0].record, "Pontiac Firebird");
    assert_eq!(rows[8].record, "Pontiac Firebird");
    assert_eq!(rows[7].record, "Volvo 142E");

    let predicted = simple.predict(&test).unwrap();
    for (row, p) in rows[..8].iter().zip(predicted.iter()) {
        assert_abs_diff_eq!(row.predicted, *p, epsilon = 1e-12);
        assert_abs_diff_eq!(row.residual, row.actual - row.predicted, epsilon = 1e-12);
    }
    assert_abs_diff_eq!(rows[0].actual, 19.2, epsilon = 1e-12);
}

#[test]
fn test_to_dataframe_columns() {
    let (train, test) = train_test();
    let model = lm("mpg ~ wt", &train).unwrap();

    let mut comparison = ModelComparison::new(&test, "mpg").unwrap();
    comparison.add_model("wt", &model).unwrap();

    let df = comparison.to_dataframe().unwrap();
    assert_eq!(
        df.column_names(),
        vec!["record", "model", "actual", "predicted", "residual"]
    );
    assert_eq!(df.nrows(), 8);
    assert_eq!(
        df.get(1, "record").unwrap(),
        SeriesValue::String("Fiat X1-9".to_string())
    );

    let rows = comparison.rows();
    let residual = df.column_f64("residual").unwrap();
    assert_abs_diff_eq!(residual[3], rows[3].residual, epsilon = 1e-12);
}

#[test]
fn test_metrics() {
    let (train, test) = train_test();
    let model = lm("mpg ~ wt + hp", &train).unwrap();

    let mut comparison = ModelComparison::new(&test, "mpg").unwrap();
    comparison.add_model("wt+hp", &model).unwrap();

    let metrics = comparison.metrics();
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[0].model, "wt+hp");

    let resid = &comparison.residuals()[0].1;
    let n = resid.len() as f64;
    let rmse = (resid.iter().map(|r| r * r).sum::<f64>() / n).sqrt();
    let mae = resid.iter().map(|r| r.abs()).sum::<f64>() / n;
    assert_abs_diff_eq!(metrics[0].rmse, rmse, epsilon = 1e-12);
    assert_abs_diff_eq!(metrics[0].mae, mae, epsilon = 1e-12);
    assert!(metrics[0].mae <= metrics[0].rmse);
    assert!(metrics[0].r_squared <= 1.0);
}

#[test]
fn test_perfect_model_metrics() {
    let df = DataFrameBuilder::new()
        .with_column("x", Series::float(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]))
        .unwrap()
        .with_column("y", Series::float(vec![3.0, 5.0, 7.0, 9.0, 11.0, 13.0]))
        .unwrap()
        .build()
        .unwrap();
    let model = lm("y ~ x", &df).unwrap();

    let mut comparison = ModelComparison::new(&df, "y").unwrap();
    comparison.add_model("exact", &model).unwrap();

    let metrics = &comparison.metrics()[0];
    assert_abs_diff_eq!(metrics.rmse, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(metrics.r_squared, 1.0, epsilon = 1e-9);
    // Range index: records are row positions
    assert_eq!(comparison.rows()[2].record, "2");
}

#[test]
fn test_residual_summaries() {
    let (train, test) = train_test();
    let model = lm("mpg ~ wt", &train).unwrap();

    let mut comparison = ModelComparison::new(&test, "mpg").unwrap();
    comparison.add_model("wt", &model).unwrap();

    let summaries = comparison.residual_summaries();
    assert_eq!(summaries.len(), 1);
    let (name, stats) = &summaries[0];
    assert_eq!(name, "wt");
    assert!(stats.min <= stats.q1 && stats.q1 <= stats.median);
    assert!(stats.median <= stats.q3 && stats.q3 <= stats.max);

    let resid = &comparison.residuals()[0].1;
    let max = resid.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    assert_abs_diff_eq!(stats.max, max, epsilon = 1e-12);
}

#[test]
fn test_add_model_errors() {
    let (train, test) = train_test();
    let model = lm("mpg ~ wt", &train).unwrap();
    let other = lm("hp ~ wt", &train).unwrap();

    let mut comparison = ModelComparison::new(&test, "mpg").unwrap();
    comparison.add_model("wt", &model).unwrap();

    let err = comparison.add_model("wt", &model).unwrap_err();
    assert!(matches!(err, ModelError::InvalidConfig { .. }));

    let err = comparison.add_model("hp", &other).unwrap_err();
    assert!(matches!(err, ModelError::InvalidConfig { .. }));

    let err = ModelComparison::new(&test, "kpl").unwrap_err();
    assert!(matches!(err, ModelError::UnknownField(ref name) if name == "kpl"));
}

#[test]
fn test_trait_objects_can_be_compared() {
    let (train, test) = train_test();
    let model = lm("mpg ~ wt", &train).unwrap();
    let boxed: Box<dyn RegressionResult> = Box::new(model);

    let mut comparison = ModelComparison::new(&test, "mpg").unwrap();
    comparison.add_model("boxed", boxed.as_ref()).unwrap();

    assert_eq!(comparison.rows().len(), 8);
}
