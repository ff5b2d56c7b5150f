//! Read-only model metadata used for reporting.
//!
//! The registry is built once (usually with `with_defaults`) and shared by
//! reference; forecasting never mutates it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::ModelId;
use crate::validation::ValidationResult;

/// Declared metrics of a model, as shown in comparison views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: ModelId,
    pub display_name: String,
    pub declared_accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub mape: f64,
    pub rmse: f64,
    pub training_time_ms: u64,
    pub prediction_time_ms: u64,
}

impl ModelDescriptor {
    /// Descriptor with F1 derived from precision and recall.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: &str,
        display_name: &str,
        declared_accuracy: f64,
        precision: f64,
        recall: f64,
        mape: f64,
        rmse: f64,
        training_time_ms: u64,
        prediction_time_ms: u64,
    ) -> Self {
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            id: ModelId::new(id),
            display_name: display_name.to_string(),
            declared_accuracy,
            precision,
            recall,
            f1,
            mape,
            rmse,
            training_time_ms,
            prediction_time_ms,
        }
    }
}

/// Declared vs observed accuracy for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelComparison {
    pub id: ModelId,
    pub display_name: String,
    pub declared_accuracy: f64,
    pub observed_accuracy: Option<f64>,
    pub observed_mape: Option<f64>,
    pub observed_rmse: Option<f64>,
    /// observed - declared, when observed exists.
    pub accuracy_gap: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelRegistry {
    descriptors: BTreeMap<ModelId, ModelDescriptor>,
}

impl ModelRegistry {
    pub fn new(descriptors: impl IntoIterator<Item = ModelDescriptor>) -> Self {
        Self {
            descriptors: descriptors.into_iter().map(|d| (d.id.clone(), d)).collect(),
        }
    }

    /// Registry with the ensemble and the two built-in strategies.
    pub fn with_defaults() -> Self {
        Self::new([
            ModelDescriptor::new(ModelId::ENSEMBLE, "Ensemble", 0.89, 0.87, 0.85, 0.042, 2.1, 4500, 120),
            ModelDescriptor::new(ModelId::LSTM, "LSTM Neural Network", 0.87, 0.85, 0.83, 0.051, 2.6, 3200, 80),
            ModelDescriptor::new(ModelId::ARIMA, "ARIMA", 0.82, 0.80, 0.78, 0.063, 3.1, 900, 25),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&ModelDescriptor> {
        self.descriptors.get(&ModelId::new(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.descriptors.values()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Join every descriptor with the observed validation for its id.
    ///
    /// Observed metrics are only reported when the validation matched at
    /// least one realized price.
    pub fn compare(&self, observed: &BTreeMap<ModelId, ValidationResult>) -> Vec<ModelComparison> {
        self.iter()
            .map(|d| {
                let result = observed.get(&d.id).filter(|r| r.validated_count() > 0);
                let observed_accuracy = result.map(|r| r.overall_accuracy);
                ModelComparison {
                    id: d.id.clone(),
                    display_name: d.display_name.clone(),
                    declared_accuracy: d.declared_accuracy,
                    observed_accuracy,
                    observed_mape: result.map(|r| r.mape),
                    observed_rmse: result.map(|r| r.rmse),
                    accuracy_gap: observed_accuracy.map(|a| a - d.declared_accuracy),
                }
            })
            .collect()
    }
}
