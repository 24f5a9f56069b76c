//! # Model Architecture
//! Static description of the trained multi-branch network: per-group
//! branches, the fusion head, headline figures, plus the feature-group sizes
//! and the features dropped for collinearity before training.
//!
//! Display data only. Nothing here is used for scoring.

use serde::Serialize;

use crate::features::FeatureGroup;
use crate::intensity::IntensityLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LayerKind {
    Dense,
    BatchNorm,
    Dropout,
    Concatenate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Activation {
    ReLU,
    Softmax,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Layer {
    pub kind: LayerKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation: Option<Activation>,
    /// Dropout rate in `[0, 1)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
}

const fn dense(units: u32, activation: Activation) -> Layer {
    Layer {
        kind: LayerKind::Dense,
        units: Some(units),
        activation: Some(activation),
        rate: None,
    }
}

const fn plain(kind: LayerKind) -> Layer {
    Layer {
        kind,
        units: None,
        activation: None,
        rate: None,
    }
}

const fn dropout(rate: f64) -> Layer {
    Layer {
        kind: LayerKind::Dropout,
        units: None,
        activation: None,
        rate: Some(rate),
    }
}

const BATCH_NORM: Layer = plain(LayerKind::BatchNorm);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Branch {
    pub name: &'static str,
    /// Feature group feeding the branch; `None` for the fusion head.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<FeatureGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_features: Option<u32>,
    pub color: &'static str,
    pub layers: &'static [Layer],
}

pub const BRANCHES: [Branch; 3] = [
    Branch {
        name: "Seismic Branch",
        group: Some(FeatureGroup::Seismic),
        input_features: Some(20),
        color: "#2196F3",
        layers: &[
            dense(16, Activation::ReLU),
            BATCH_NORM,
            dropout(0.6),
            dense(8, Activation::ReLU),
            BATCH_NORM,
            dropout(0.6),
        ],
    },
    Branch {
        name: "Mechanical Branch",
        group: Some(FeatureGroup::Mechanical),
        input_features: Some(6),
        color: "#FF5722",
        layers: &[dense(8, Activation::ReLU), BATCH_NORM, dropout(0.6)],
    },
    Branch {
        name: "Geological Branch",
        group: Some(FeatureGroup::Geological),
        input_features: Some(37),
        color: "#4CAF50",
        layers: &[dense(8, Activation::ReLU), BATCH_NORM, dropout(0.6)],
    },
];

pub const FUSION: Branch = Branch {
    name: "Fusion Layer",
    group: None,
    input_features: None,
    color: "#9C27B0",
    layers: &[
        plain(LayerKind::Concatenate),
        dense(8, Activation::ReLU),
        BATCH_NORM,
        dropout(0.7),
        dense(IntensityLevel::COUNT as u32, Activation::Softmax),
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelSummary {
    /// Rounded; the dashboard shows "~2,500".
    pub approx_parameters: u32,
    pub input_features: u32,
    pub output_classes: usize,
    pub regularization: &'static str,
}

pub const SUMMARY: ModelSummary = ModelSummary {
    approx_parameters: 2500,
    input_features: 63,
    output_classes: IntensityLevel::COUNT,
    regularization: "L1/L2 + Dropout",
};

/// Size of one input feature group in the trained model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupSize {
    pub name: &'static str,
    pub group: FeatureGroup,
    pub count: u32,
    pub color: &'static str,
}

pub const FEATURE_GROUPS: [GroupSize; 3] = [
    GroupSize {
        name: "Seismic Features",
        group: FeatureGroup::Seismic,
        count: 20,
        color: "#2196F3",
    },
    GroupSize {
        name: "Mechanical Features",
        group: FeatureGroup::Mechanical,
        count: 6,
        color: "#FF5722",
    },
    GroupSize {
        name: "Geological Features",
        group: FeatureGroup::Geological,
        count: 37,
        color: "#4CAF50",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RemovedFeature {
    pub name: &'static str,
    pub correlation: f64,
    pub reason: &'static str,
}

const COLLINEAR: &str = "Too highly correlated";

pub const REMOVED_FEATURES: [RemovedFeature; 5] = [
    RemovedFeature {
        name: "peak_ground_acceleration",
        correlation: 0.968,
        reason: COLLINEAR,
    },
    RemovedFeature {
        name: "tangential_stress",
        correlation: 0.968,
        reason: COLLINEAR,
    },
    RemovedFeature {
        name: "seismic_event_rate",
        correlation: 0.964,
        reason: COLLINEAR,
    },
    RemovedFeature {
        name: "depth",
        correlation: 0.962,
        reason: COLLINEAR,
    },
    RemovedFeature {
        name: "compressive_strength",
        correlation: 0.961,
        reason: COLLINEAR,
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub branches: Vec<Branch>,
    pub fusion: Branch,
    pub summary: ModelSummary,
    pub feature_groups: Vec<GroupSize>,
    pub removed_features: Vec<RemovedFeature>,
}

pub fn model_info() -> ModelInfo {
    ModelInfo {
        branches: BRANCHES.to_vec(),
        fusion: FUSION,
        summary: SUMMARY,
        feature_groups: FEATURE_GROUPS.to_vec(),
        removed_features: REMOVED_FEATURES.to_vec(),
    }
}
