//! Tests for formula parsing and resolution

use super::*;
use crate::data::{DataFrameBuilder, Series};

fn cars() -> DataFrame {
    DataFrameBuilder::new()
        .with_column("mpg", Series::float(vec![21.0, 22.8, 21.4, 18.7, 18.1]))
        .unwrap()
        .with_column("wt", Series::float(vec![2.62, 2.32, 3.215, 3.44, 3.46]))
        .unwrap()
        .with_column("cyl", Series::int(vec![6, 4, 6, 8, 6]))
        .unwrap()
        .with_column("am", Series::bool(vec![true, true, false, false, false]))
        .unwrap()
        .with_column(
            "make",
            Series::string(
                ["Mazda", "Datsun", "Hornet", "Hornet", "Valiant"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>(),
            ),
        )
        .unwrap()
        .build()
        .unwrap()
}

// ==================== Parsing ====================

#[test]
fn test_parse_simple_formula() {
    let formula = Formula::parse("mpg ~ wt + cyl").unwrap();

    assert_eq!(formula.response.as_deref(), Some("mpg"));
    assert_eq!(
        formula.terms,
        vec![
            Term::Variable("wt".to_string()),
            Term::Variable("cyl".to_string())
        ]
    );
    assert!(formula.has_intercept);
    assert_eq!(formula.to_string(), "mpg ~ wt + cyl");
}

#[test]
fn test_parse_intercept_only() {
    let formula = Formula::parse("mpg ~ 1").unwrap();
    assert!(formula.terms.is_empty());
    assert!(formula.has_intercept);
    assert_eq!(formula.to_string(), "mpg ~ 1");
}

#[test]
fn test_parse_intercept_removal() {
    let zero = Formula::parse("y ~ 0 + x").unwrap();
    assert!(!zero.has_intercept);

    let minus_one = Formula::parse("y ~ x - 1").unwrap();
    assert!(!minus_one.has_intercept);
    assert_eq!(minus_one.terms, vec![Term::Variable("x".to_string())]);

    assert_eq!(zero.to_string(), "y ~ 0 + x");
}

#[test]
fn test_parse_dot_with_removal() {
    let formula = Formula::parse("mpg ~ . - make").unwrap();
    assert_eq!(formula.terms, vec![Term::Dot]);
    assert_eq!(formula.removed, vec!["make".to_string()]);
}

#[test]
fn test_parse_duplicate_terms_collapse() {
    let formula = Formula::parse("y ~ x + x").unwrap();
    assert_eq!(formula.terms.len(), 1);
}

#[test]
fn test_parse_errors() {
    assert!(matches!(Formula::parse(""), Err(FormulaError::Syntax { .. })));
    assert!(matches!(Formula::parse("y x"), Err(FormulaError::Syntax { .. })));
    assert!(matches!(Formula::parse("y ~"), Err(FormulaError::Syntax { .. })));
    assert!(matches!(Formula::parse("y ~ x +"), Err(FormulaError::Syntax { .. })));
    assert!(matches!(Formula::parse("y ~ + x"), Err(FormulaError::Syntax { .. })));
    assert!(matches!(Formula::parse("y ~ x * z"), Err(FormulaError::Syntax { .. })));
    assert!(matches!(Formula::parse("y ~ x - ."), Err(FormulaError::Syntax { .. })));
}

#[test]
fn test_syntax_error_position() {
    match Formula::parse("y ~ x $ z") {
        Err(FormulaError::Syntax { position, .. }) => assert_eq!(position, 6),
        other => panic!("expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_from_str() {
    let formula: Formula = "mpg ~ wt".parse().unwrap();
    assert_eq!(formula.response().unwrap(), "mpg");
}

#[test]
fn test_with_response_builds_formula() {
    let formula = Formula::with_response("mpg", &["wt", "qsec"]);
    assert_eq!(formula.to_string(), "mpg ~ wt + qsec");
    assert_eq!(formula.original, "mpg ~ wt + qsec");

    let empty = Formula::with_response::<&str>("mpg", &[]);
    assert_eq!(empty.to_string(), "mpg ~ 1");
}

// ==================== Resolution ====================

#[test]
fn test_predictors_explicit() {
    let df = cars();
    let formula = Formula::parse("mpg ~ cyl + wt").unwrap();
    assert_eq!(formula.predictors(&df).unwrap(), vec!["cyl", "wt"]);
}

#[test]
fn test_predictors_dot_skips_response_and_strings() {
    let df = cars();
    let formula = Formula::parse("mpg ~ .").unwrap();
    assert_eq!(formula.predictors(&df).unwrap(), vec!["wt", "cyl", "am"]);
}

#[test]
fn test_predictors_dot_minus_variable() {
    let df = cars();
    let formula = Formula::parse("mpg ~ . - cyl").unwrap();
    assert_eq!(formula.predictors(&df).unwrap(), vec!["wt", "am"]);
}

#[test]
fn test_predictors_unknown_variable() {
    let df = cars();
    let formula = Formula::parse("mpg ~ wt + horsepower").unwrap();

    match formula.predictors(&df) {
        Err(FormulaError::VariableNotFound { variable, .. }) => {
            assert_eq!(variable, "horsepower")
        }
        other => panic!("expected VariableNotFound, got {:?}", other),
    }
}

#[test]
fn test_predictors_unknown_response() {
    let df = cars();
    let formula = Formula::parse("kpl ~ wt").unwrap();
    assert!(matches!(
        formula.predictors(&df),
        Err(FormulaError::VariableNotFound { .. })
    ));
}

#[test]
fn test_predictors_string_column_rejected() {
    let df = cars();
    let formula = Formula::parse("mpg ~ make").unwrap();
    assert!(matches!(
        formula.predictors(&df),
        Err(FormulaError::TypeMismatch { .. })
    ));
}

#[test]
fn test_predictors_response_on_rhs_rejected() {
    let df = cars();
    let formula = Formula::parse("mpg ~ wt + mpg").unwrap();
    assert!(matches!(
        formula.predictors(&df),
        Err(FormulaError::InvalidStructure { .. })
    ));
}

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_formula_display_roundtrip(formula_str in r"[a-z]{1,3} ~ [a-z]{1,3}( \+ [a-z]{1,3}){0,4}") {
            let formula = Formula::parse(&formula_str).unwrap();
            let reparsed = Formula::parse(&formula.to_string()).unwrap();
            prop_assert_eq!(formula.terms, reparsed.terms);
            prop_assert_eq!(formula.response, reparsed.response);
        }
    }
}
