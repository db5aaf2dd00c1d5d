//! Stage domain types

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigurationError;
use crate::primitive::Operation;
use crate::values::{OverrideValues, SourceList};

/// One deployment concern of an add-on
///
/// The declaration order is the dependency order: CRDs must exist before the
/// chart's controllers start, and configuration or function packages need
/// the controller they configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageKind {
    Crds,
    CoreChart,
    Configurations,
    Functions,
}

impl StageKind {
    pub const ALL: [StageKind; 4] = [
        StageKind::Crds,
        StageKind::CoreChart,
        StageKind::Configurations,
        StageKind::Functions,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StageKind::Crds => "CRDs",
            StageKind::CoreChart => "core-chart",
            StageKind::Configurations => "configurations",
            StageKind::Functions => "functions",
        }
    }

    /// The primitive operation this stage invokes
    pub fn operation(&self) -> Operation {
        match self {
            StageKind::Crds => Operation::InstallCrds,
            StageKind::CoreChart => Operation::DeployChart,
            StageKind::Configurations | StageKind::Functions => Operation::ApplyManifests,
        }
    }

    /// Whether the stage applies into a namespace (CRDs and the chart do not)
    pub fn is_namespaced(&self) -> bool {
        matches!(self, StageKind::Configurations | StageKind::Functions)
    }

    pub fn accepts_overrides(&self) -> bool {
        matches!(self, StageKind::CoreChart)
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StageKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "crds" => Ok(StageKind::Crds),
            "core-chart" | "core" | "chart" => Ok(StageKind::CoreChart),
            "configurations" | "configuration" => Ok(StageKind::Configurations),
            "functions" | "function" => Ok(StageKind::Functions),
            _ => Err(ConfigurationError::UnknownStage(s.to_string())),
        }
    }
}

/// Compiled-in defaults for one stage of an add-on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageDefaults {
    pub sources: &'static [&'static str],
    pub namespace: Option<&'static str>,
}

/// Resolved configuration of one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageConfig {
    pub enabled: bool,
    pub sources: SourceList,
    pub namespace: Option<String>,
    pub overrides: OverrideValues,
}

impl StageConfig {
    /// Configuration of a disabled stage
    ///
    /// Caller input is not parsed, so a disabled stage never yields an error.
    pub fn disabled(defaults: &StageDefaults) -> Self {
        Self {
            enabled: false,
            sources: SourceList::from_static(defaults.sources),
            namespace: defaults.namespace.map(str::to_string),
            overrides: OverrideValues::default(),
        }
    }

    /// The single chart reference of a core chart stage
    pub fn chart_reference(&self) -> Option<&str> {
        self.sources.first()
    }
}

/// Caller-supplied parameters for one stage, merged over its defaults
///
/// Every field is optional; `None` means "use the default". Sources and
/// overrides are accepted in their comma-joined wire form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageInput {
    pub enabled: Option<bool>,
    pub sources: Option<String>,
    pub namespace: Option<String>,
    pub overrides: Option<String>,
}

impl StageInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn disabled() -> Self {
        Self::new().enabled(false)
    }

    pub fn with_sources(mut self, sources: impl Into<String>) -> Self {
        self.sources = Some(sources.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_overrides(mut self, overrides: impl Into<String>) -> Self {
        self.overrides = Some(overrides.into());
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Merges this input over `defaults` for a stage of kind `kind`
    pub fn resolve(
        &self,
        kind: StageKind,
        defaults: &StageDefaults,
    ) -> Result<StageConfig, ConfigurationError> {
        if !self.is_enabled() {
            return Ok(StageConfig::disabled(defaults));
        }

        let sources = match &self.sources {
            Some(raw) => SourceList::parse(raw)?,
            None => SourceList::from_static(defaults.sources),
        };
        if kind == StageKind::CoreChart && sources.len() != 1 {
            return Err(ConfigurationError::MultipleChartReferences {
                count: sources.len(),
            });
        }

        let namespace = match &self.namespace {
            Some(_) if !kind.is_namespaced() => {
                return Err(ConfigurationError::NamespaceNotSupported { stage: kind });
            }
            Some(namespace) if namespace.is_empty() => None,
            Some(namespace) => Some(namespace.clone()),
            None => defaults.namespace.map(str::to_string),
        };

        let overrides = match &self.overrides {
            Some(raw) if !kind.accepts_overrides() && !raw.is_empty() => {
                return Err(ConfigurationError::OverridesNotSupported { stage: kind });
            }
            Some(raw) => OverrideValues::parse(raw)?,
            None => OverrideValues::default(),
        };

        Ok(StageConfig {
            enabled: true,
            sources,
            namespace,
            overrides,
        })
    }
}
