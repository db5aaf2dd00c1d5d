//! Add-on catalogue
//!
//! Each add-on fixes the order of its stages and the compiled-in defaults
//! for each of them. Callers can toggle and parametrize stages but never
//! reorder them.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::stage::{StageDefaults, StageKind};
use crate::error::ConfigurationError;

/// Namespace used by namespaced stages unless the caller overrides it
pub const DEFAULT_NAMESPACE: &str = "crossplane-system";

macro_rules! crossplane_package {
    ($path:literal) => {
        concat!(
            "https://raw.githubusercontent.com/stuttgart-things/crossplane/refs/heads/main/packages",
            $path
        )
    };
}

/// Supported add-ons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Addon {
    Crossplane,
    Cilium,
}

/// Stage layout and defaults of an add-on
#[derive(Debug, Serialize)]
pub struct AddonDefinition {
    pub name: &'static str,
    pub description: &'static str,
    /// Stages in execution order
    pub stages: &'static [(StageKind, StageDefaults)],
}

static CROSSPLANE: AddonDefinition = AddonDefinition {
    name: "crossplane",
    description: "Crossplane control plane with configuration and function packages",
    stages: &[
        (
            StageKind::Crds,
            StageDefaults {
                sources: &[
                    "https://github.com/stuttgart-things/helm/cicd/crds/crossplane",
                ],
                namespace: None,
            },
        ),
        (
            StageKind::CoreChart,
            StageDefaults {
                sources: &[
                    "git::https://github.com/stuttgart-things/helm.git@cicd/crossplane.yaml.gotmpl",
                ],
                namespace: None,
            },
        ),
        (
            StageKind::Configurations,
            StageDefaults {
                sources: &[
                    crossplane_package!("/configurations/volume-claim.yaml"),
                    crossplane_package!("/configurations/storage-platform.yaml"),
                    crossplane_package!("/configurations/pipeline-integration.yaml"),
                    crossplane_package!("/configurations/ansible-run.yaml"),
                    crossplane_package!("/configurations/cloud-config.yaml"),
                ],
                namespace: Some(DEFAULT_NAMESPACE),
            },
        ),
        (
            StageKind::Functions,
            StageDefaults {
                sources: &[
                    crossplane_package!("/functions/function-auto-ready.yaml"),
                    crossplane_package!("/functions/function-go-templating.yaml"),
                    crossplane_package!("/functions/function-kcl.yaml"),
                    crossplane_package!("/functions/function-patch-and-transform.yaml"),
                ],
                namespace: Some(DEFAULT_NAMESPACE),
            },
        ),
    ],
};

static CILIUM: AddonDefinition = AddonDefinition {
    name: "cilium",
    description: "Cilium CNI",
    stages: &[
        (
            StageKind::Crds,
            StageDefaults {
                sources: &["https://github.com/stuttgart-things/helm/infra/crds/cilium"],
                namespace: None,
            },
        ),
        (
            StageKind::CoreChart,
            StageDefaults {
                sources: &[
                    "git::https://github.com/stuttgart-things/helm.git@infra/cilium.yaml.gotmpl",
                ],
                namespace: None,
            },
        ),
    ],
};

impl Addon {
    pub const ALL: [Addon; 2] = [Addon::Crossplane, Addon::Cilium];

    pub fn definition(&self) -> &'static AddonDefinition {
        match self {
            Addon::Crossplane => &CROSSPLANE,
            Addon::Cilium => &CILIUM,
        }
    }

    pub fn name(&self) -> &'static str {
        self.definition().name
    }

    /// Defaults for `kind`, or an error if this add-on has no such stage
    pub fn require(&self, kind: StageKind) -> Result<&'static StageDefaults, ConfigurationError> {
        self.definition()
            .defaults_for(kind)
            .ok_or(ConfigurationError::StageNotDefined {
                addon: *self,
                stage: kind,
            })
    }
}

impl fmt::Display for Addon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Addon {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Addon::ALL
            .into_iter()
            .find(|addon| addon.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigurationError::UnknownAddon(s.to_string()))
    }
}

impl AddonDefinition {
    /// Stage kinds in execution order
    pub fn stage_kinds(&self) -> impl Iterator<Item = StageKind> + '_ {
        self.stages.iter().map(|(kind, _)| *kind)
    }

    pub fn defaults_for(&self, kind: StageKind) -> Option<&StageDefaults> {
        self.stages
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, defaults)| defaults)
    }

    pub fn has_stage(&self, kind: StageKind) -> bool {
        self.defaults_for(kind).is_some()
    }
}
