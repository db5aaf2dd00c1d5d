//! Pipeline run domain types

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::credential::Credential;
use crate::domain::addon::Addon;
use crate::domain::stage::{StageConfig, StageInput, StageKind};
use crate::error::{ConfigurationError, PipelineError};

/// Status of a pipeline run
///
/// Only ever moves forward: `Pending → Running → Succeeded | Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunStatus {
    Pending,
    Running,
    Succeeded,
    Failed { stage: StageKind, cause: String },
}

impl RunStatus {
    fn rank(&self) -> u8 {
        match self {
            RunStatus::Pending => 0,
            RunStatus::Running => 1,
            RunStatus::Succeeded | RunStatus::Failed { .. } => 2,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.rank() == 2
    }

    /// Moves to `next` if that is a forward transition
    ///
    /// Returns `false` and leaves the status untouched otherwise, so a
    /// terminal status is never overwritten.
    pub fn advance(&mut self, next: RunStatus) -> bool {
        if self.is_terminal() || next.rank() <= self.rank() {
            return false;
        }
        *self = next;
        true
    }
}

/// Caller configuration bundle for one pipeline invocation
///
/// Holds per-stage input and the shared credential. The stage order is not
/// part of the input; it comes from the add-on definition.
#[derive(Debug, Clone)]
pub struct PipelineInput {
    pub addon: Addon,
    stages: BTreeMap<StageKind, StageInput>,
    credential: Option<Credential>,
}

impl PipelineInput {
    pub fn new(addon: Addon) -> Self {
        Self {
            addon,
            stages: BTreeMap::new(),
            credential: None,
        }
    }

    pub fn with_stage(mut self, kind: StageKind, input: StageInput) -> Self {
        self.stages.insert(kind, input);
        self
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Sets the target namespace of every namespaced stage of the add-on
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        for kind in self.addon.definition().stage_kinds() {
            if kind.is_namespaced() {
                self.stages.entry(kind).or_default().namespace = Some(namespace.clone());
            }
        }
        self
    }

    pub fn stage(&self, kind: StageKind) -> Option<&StageInput> {
        self.stages.get(&kind)
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }
}

/// One execution of an add-on pipeline
///
/// Built fresh from a [`PipelineInput`] for every invocation and discarded
/// afterwards. Only `status` and the timestamps change after planning.
#[derive(Debug, Serialize)]
pub struct PipelineRun {
    pub id: Uuid,
    pub addon: Addon,
    stages: Vec<(StageKind, StageConfig)>,
    status: RunStatus,
    #[serde(skip)]
    credential: Option<Credential>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl PipelineRun {
    /// Resolves every stage of the input's add-on in execution order
    ///
    /// Enabled stages are fully validated here, so a malformed stage fails
    /// the run before anything touches the cluster. Input for a stage the
    /// add-on does not define is an error unless that input disables it.
    pub fn plan(input: PipelineInput) -> Result<Self, PipelineError> {
        let definition = input.addon.definition();

        if let Some((&kind, _)) = input
            .stages
            .iter()
            .find(|(kind, stage)| !definition.has_stage(**kind) && stage.is_enabled())
        {
            return Err(PipelineError::new(
                kind,
                ConfigurationError::StageNotDefined {
                    addon: input.addon,
                    stage: kind,
                },
            ));
        }

        let default_input = StageInput::default();
        let mut stages = Vec::with_capacity(definition.stages.len());
        for (kind, defaults) in definition.stages {
            let stage_input = input.stages.get(kind).unwrap_or(&default_input);
            let config = stage_input
                .resolve(*kind, defaults)
                .map_err(|e| PipelineError::new(*kind, e))?;
            stages.push((*kind, config));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            addon: input.addon,
            stages,
            status: RunStatus::Pending,
            credential: input.credential,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        })
    }

    pub fn status(&self) -> &RunStatus {
        &self.status
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// All stages in execution order, disabled ones included
    pub fn stages(&self) -> &[(StageKind, StageConfig)] {
        &self.stages
    }

    pub fn enabled_stages(&self) -> impl Iterator<Item = &(StageKind, StageConfig)> {
        self.stages.iter().filter(|(_, config)| config.enabled)
    }

    /// Marks the run as started; `false` if it already was
    pub fn start(&mut self) -> bool {
        let moved = self.status.advance(RunStatus::Running);
        if moved {
            self.started_at = Some(Utc::now());
        }
        moved
    }

    pub fn succeed(&mut self) -> bool {
        self.finish(RunStatus::Succeeded)
    }

    /// Records the failing stage; only the first failure is kept
    pub fn fail(&mut self, stage: StageKind, cause: impl Into<String>) -> bool {
        self.finish(RunStatus::Failed {
            stage,
            cause: cause.into(),
        })
    }

    fn finish(&mut self, status: RunStatus) -> bool {
        let moved = self.status.advance(status);
        if moved {
            self.finished_at = Some(Utc::now());
        }
        moved
    }
}
