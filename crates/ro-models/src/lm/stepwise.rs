//! Stepwise model selection by AIC
//!
//! Greedy search over predictor subsets, scoring each candidate with
//! `n·ln(RSS/n) + k·p`. At every step all single-term additions and/or drops
//! are fitted and the best strictly improving move is accepted. Candidates
//! are tried in lexical order, additions before drops, and only a strictly
//! lower score replaces the running best, so ties resolve to the first
//! candidate tried.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::base::{ModelError, Result};
use crate::lm::{FittedModel, LinearConfig, LinearRegression};
use ro_core::data::DataFrame;

/// Search direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Only add terms
    Forward,
    /// Only drop terms
    Backward,
    /// Consider both at every step
    Both,
}

/// Stepwise selection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepwiseConfig {
    pub direction: Direction,
    /// Penalty per parameter; 2 gives AIC, `ln(n)` gives BIC
    pub k: f64,
    /// Upper bound on accepted steps
    pub max_steps: Option<usize>,
    /// Configuration of every fitted candidate
    pub linear: LinearConfig,
}

impl Default for StepwiseConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Forward,
            k: 2.0,
            max_steps: None,
            linear: LinearConfig::default(),
        }
    }
}

impl StepwiseConfig {
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_k(mut self, k: f64) -> Self {
        self.k = k;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn with_linear(mut self, linear: LinearConfig) -> Self {
        self.linear = linear;
        self
    }
}

/// A single move of the search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepAction {
    Add(String),
    Drop(String),
}

impl StepAction {
    /// The variable added or dropped
    pub fn variable(&self) -> &str {
        match self {
            StepAction::Add(name) | StepAction::Drop(name) => name,
        }
    }

    /// Change in coefficient count as reported in R's anova table
    fn df_change(&self) -> i64 {
        match self {
            StepAction::Add(_) => -1,
            StepAction::Drop(_) => 1,
        }
    }
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepAction::Add(name) => write!(f, "+ {}", name),
            StepAction::Drop(name) => write!(f, "- {}", name),
        }
    }
}

/// One accepted step of the search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionStep {
    pub action: StepAction,
    /// −1 for an addition, +1 for a drop
    pub df_change: i64,
    /// |ΔRSS| caused by the move
    pub deviance_change: f64,
    /// Residual degrees of freedom after the move
    pub df_residual: usize,
    /// RSS after the move
    pub deviance: f64,
    /// Score after the move
    pub aic: f64,
}

/// Outcome of a stepwise search.
///
/// Only produced when every candidate fitted along the way succeeded. A
/// candidate that cannot be fitted, such as a predictor collinear with the
/// current terms, fails the whole search even if it would never have been
/// chosen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepwiseResult {
    /// Final model
    pub model: FittedModel,
    /// Accepted steps, in order
    pub steps: Vec<SelectionStep>,
    /// Score of the starting model
    pub initial_aic: f64,
    /// RSS of the starting model
    pub initial_deviance: f64,
    /// Residual degrees of freedom of the starting model
    pub initial_df_residual: usize,
}

impl StepwiseResult {
    /// Predictors of the final model, in the order they entered
    pub fn selected(&self) -> &[String] {
        self.model.predictors()
    }

    /// Score of the final model
    pub fn final_aic(&self) -> f64 {
        self.steps.last().map_or(self.initial_aic, |s| s.aic)
    }
}

impl fmt::Display for StepwiseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Final model: {}", self.model.formula())?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<16} {:>4} {:>12} {:>10} {:>12} {:>10}",
            "Step", "Df", "Deviance", "Resid. Df", "Resid. Dev", "AIC"
        )?;
        writeln!(
            f,
            "{:<16} {:>4} {:>12} {:>10} {:>12.4} {:>10.4}",
            "", "", "", self.initial_df_residual, self.initial_deviance, self.initial_aic
        )?;
        for step in &self.steps {
            writeln!(
                f,
                "{:<16} {:>4} {:>12.4} {:>10} {:>12.4} {:>10.4}",
                step.action.to_string(),
                step.df_change,
                step.deviance_change,
                step.df_residual,
                step.deviance,
                step.aic
            )?;
        }
        Ok(())
    }
}

/// Stepwise selector
#[derive(Debug, Clone, Default)]
pub struct Stepwise {
    config: StepwiseConfig,
}

impl Stepwise {
    pub fn new(config: StepwiseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StepwiseConfig {
        &self.config
    }

    /// Search from the `start` predictors within `scope`.
    ///
    /// `start` terms are always eligible for dropping even when absent from
    /// `scope`.
    ///
    /// # Errors
    ///
    /// The first candidate fit that fails is returned as is, e.g.
    /// [`ModelError::DegenerateFit`] for a collinear addition or
    /// [`ModelError::UnknownField`] for a name missing from `data`.
    pub fn run<S, T>(
        &self,
        data: &DataFrame,
        response: &str,
        scope: &[S],
        start: &[T],
    ) -> Result<StepwiseResult>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        if !(self.config.k.is_finite() && self.config.k >= 0.0) {
            return Err(ModelError::invalid_config(format!(
                "penalty k must be finite and non-negative, got {}",
                self.config.k
            )));
        }

        let k = self.config.k;
        let mut current: Vec<String> = start.iter().map(|s| s.as_ref().to_string()).collect();
        let mut scope: Vec<String> = scope.iter().map(|s| s.as_ref().to_string()).collect();
        scope.sort();
        scope.dedup();

        let mut model = self.fit(data, response, &current)?;
        let mut score = model.extract_aic(k);
        let initial_aic = score;
        let initial_deviance = model.rss();
        let initial_df_residual = model.df_residual();

        info!("stepwise start: {}, AIC={:.4}", model.formula(), score);

        let mut steps = Vec::new();
        loop {
            if self.config.max_steps.is_some_and(|max| steps.len() >= max) {
                debug!("stepwise: reached max_steps");
                break;
            }

            let mut best: Option<(f64, StepAction, FittedModel)> = None;
            for action in self.moves(&current, &scope) {
                let candidate = apply(&current, &action);
                let fitted = self.fit(data, response, &candidate)?;
                let candidate_score = fitted.extract_aic(k);
                debug!("  {:<16} AIC={:.4}", action.to_string(), candidate_score);

                if best.as_ref().is_none_or(|(s, _, _)| candidate_score < *s) {
                    best = Some((candidate_score, action, fitted));
                }
            }

            let Some((best_score, action, fitted)) = best else {
                break;
            };
            if best_score >= score {
                break;
            }

            info!("stepwise: {}, AIC={:.4}", action, best_score);
            steps.push(SelectionStep {
                df_change: action.df_change(),
                deviance_change: (model.rss() - fitted.rss()).abs(),
                df_residual: fitted.df_residual(),
                deviance: fitted.rss(),
                aic: best_score,
                action: action.clone(),
            });

            current = apply(&current, &action);
            model = fitted;
            score = best_score;
        }

        info!(
            "stepwise done after {} steps: {}, AIC={:.4}",
            steps.len(),
            model.formula(),
            score
        );

        Ok(StepwiseResult {
            model,
            steps,
            initial_aic,
            initial_deviance,
            initial_df_residual,
        })
    }

    /// Candidate moves from `current`: additions then drops, each lexical
    fn moves(&self, current: &[String], scope: &[String]) -> Vec<StepAction> {
        let mut moves = Vec::new();

        if matches!(self.config.direction, Direction::Forward | Direction::Both) {
            moves.extend(
                scope
                    .iter()
                    .filter(|name| !current.contains(name))
                    .map(|name| StepAction::Add(name.clone())),
            );
        }

        // Without an intercept the last term cannot go
        let can_drop = self.config.linear.intercept || current.len() > 1;
        if matches!(self.config.direction, Direction::Backward | Direction::Both) && can_drop {
            let mut drops: Vec<&String> = current.iter().collect();
            drops.sort();
            moves.extend(drops.into_iter().map(|name| StepAction::Drop(name.clone())));
        }

        moves
    }

    fn fit(&self, data: &DataFrame, response: &str, predictors: &[String]) -> Result<FittedModel> {
        LinearRegression::from_names(response, predictors)
            .config(self.config.linear.clone())
            .data(data)
            .fit()
    }
}

fn apply(current: &[String], action: &StepAction) -> Vec<String> {
    match action {
        StepAction::Add(name) => {
            let mut next = current.to_vec();
            next.push(name.clone());
            next
        }
        StepAction::Drop(name) => current.iter().filter(|n| *n != name).cloned().collect(),
    }
}

/// Forward selection from the intercept-only model over `candidates`
pub fn select_forward<S: AsRef<str>>(
    train: &DataFrame,
    response: &str,
    candidates: &[S],
) -> Result<StepwiseResult> {
    let start: [&str; 0] = [];
    Stepwise::default().run(train, response, candidates, &start)
}

/// Backward elimination from the model with every predictor in `predictors`
pub fn select_backward<S: AsRef<str>>(
    train: &DataFrame,
    response: &str,
    predictors: &[S],
) -> Result<StepwiseResult> {
    let config = StepwiseConfig::default().with_direction(Direction::Backward);
    Stepwise::new(config).run(train, response, predictors, predictors)
}
