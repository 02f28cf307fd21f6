// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Simulation payloads a path can carry.
//!
//! A path's kind is never stored on its own: [`Payload::kind`] derives it
//! from the active variant, so the two cannot drift apart.

use serde::{Deserialize, Serialize};

/// Tag naming which payload variant a path carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathKind {
    #[default]
    None,
    Generic,
    Source,
    Boundary,
    Dielectric,
}

impl PathKind {
    /// Parse a kind name; unknown names yield `None`
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "None" => Some(PathKind::None),
            "Generic" => Some(PathKind::Generic),
            "Source" => Some(PathKind::Source),
            "Boundary" => Some(PathKind::Boundary),
            "Dielectric" => Some(PathKind::Dielectric),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PathKind::None => "None",
            PathKind::Generic => "Generic",
            PathKind::Source => "Source",
            PathKind::Boundary => "Boundary",
            PathKind::Dielectric => "Dielectric",
        }
    }

    /// Default payload for a freshly tagged path
    pub fn default_payload(self) -> Payload {
        match self {
            PathKind::None => Payload::None,
            PathKind::Generic => Payload::Generic(GenericPayload::default()),
            PathKind::Source => Payload::Source(SourcePayload::default()),
            PathKind::Boundary => Payload::Boundary(BoundaryPayload::default()),
            PathKind::Dielectric => Payload::Dielectric(DielectricPayload::default()),
        }
    }
}

/// Tagged payload; the variant is the path's kind
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    #[default]
    None,
    Generic(GenericPayload),
    Source(SourcePayload),
    Boundary(BoundaryPayload),
    Dielectric(DielectricPayload),
}

impl Payload {
    pub fn kind(&self) -> PathKind {
        match self {
            Payload::None => PathKind::None,
            Payload::Generic(_) => PathKind::Generic,
            Payload::Source(_) => PathKind::Source,
            Payload::Boundary(_) => PathKind::Boundary,
            Payload::Dielectric(_) => PathKind::Dielectric,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Payload::None)
    }

    /// Serialize the active variant as a plain object (`None` for no payload)
    pub fn to_value(&self) -> Result<Option<serde_json::Value>, serde_json::Error> {
        Ok(match self {
            Payload::None => None,
            Payload::Generic(p) => Some(serde_json::to_value(p)?),
            Payload::Source(p) => Some(serde_json::to_value(p)?),
            Payload::Boundary(p) => Some(serde_json::to_value(p)?),
            Payload::Dielectric(p) => Some(serde_json::to_value(p)?),
        })
    }

    /// Deserialize a plain payload object using `kind` to pick the variant
    pub fn from_value(kind: PathKind, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            PathKind::None => Payload::None,
            PathKind::Generic => Payload::Generic(serde_json::from_value(value)?),
            PathKind::Source => Payload::Source(serde_json::from_value(value)?),
            PathKind::Boundary => Payload::Boundary(serde_json::from_value(value)?),
            PathKind::Dielectric => Payload::Dielectric(serde_json::from_value(value)?),
        })
    }
}

// ============================================================================
// PAYLOAD VARIANTS
// ============================================================================

/// Free-form payload for user annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericPayload {
    pub x: f64,
    pub y: f64,
    pub data: String,
    pub meta: String,
}

impl Default for GenericPayload {
    fn default() -> Self {
        Self {
            x: 1.0,
            y: 1.0,
            data: String::new(),
            meta: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    #[default]
    HardE,
    HardH,
    SoftE,
    SoftH,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    #[default]
    Gaussian,
    Sine,
    Ricker,
    User,
}

/// Excitation source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcePayload {
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub waveform: Waveform,
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
    /// Pulse width (seconds)
    pub tau: f64,
    /// Pulse delay (seconds)
    pub t0: f64,
    pub direction: [f64; 3],
}

impl Default for SourcePayload {
    fn default() -> Self {
        Self {
            source_type: SourceType::HardE,
            waveform: Waveform::Gaussian,
            amplitude: 1.0,
            frequency: 0.0,
            phase: 0.0,
            tau: 1e-9,
            t0: 0.0,
            direction: [1.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryKind {
    #[default]
    #[serde(rename = "PEC")]
    Pec,
    #[serde(rename = "PMC")]
    Pmc,
    #[serde(rename = "PML")]
    Pml,
    Mur1,
    Mur2,
    #[serde(rename = "TFSF")]
    Tfsf,
}

/// Boundary condition region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryPayload {
    pub kind: BoundaryKind,
    pub thickness_cells: u32,
    pub pml_order: u32,
    pub sigma_max: f64,
    pub kappa_max: f64,
    pub alpha_max: f64,
    pub ref_pos: [f64; 3],
    pub normal: [f64; 3],
}

impl Default for BoundaryPayload {
    fn default() -> Self {
        Self {
            kind: BoundaryKind::Pec,
            thickness_cells: 10,
            pml_order: 3,
            sigma_max: 1.0,
            kappa_max: 1.0,
            alpha_max: 0.0,
            ref_pos: [0.0; 3],
            normal: [1.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispersionModel {
    #[default]
    None,
    Debye,
    Drude,
    Lorentz,
}

/// Material region; permittivities are complex `[re, im]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DielectricPayload {
    pub eps_r: [f64; 2],
    pub mu_r: [f64; 2],
    pub sigma_e: f64,
    pub sigma_m: f64,
    pub disp_model: DispersionModel,
    pub disp_par: [f64; 4],
}

impl Default for DielectricPayload {
    fn default() -> Self {
        Self {
            eps_r: [1.0, 0.0],
            mu_r: [1.0, 0.0],
            sigma_e: 0.0,
            sigma_m: 0.0,
            disp_model: DispersionModel::None,
            disp_par: [0.0; 4],
        }
    }
}
