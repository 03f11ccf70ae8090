use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("rule file not found: {0}")]
    NotFound(String),

    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where a project keeps its rule marker files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesLayout {
    /// Rules directory, relative to the project root.
    pub dir: String,
    /// Opt-in marker. Its presence enables the critical-rules block.
    pub integration_file: String,
    /// Optional plan file, embedded when present.
    pub plan_file: String,
}

impl Default for RulesLayout {
    fn default() -> Self {
        Self {
            dir: ".clinerules".into(),
            integration_file: "zoro_integration.md".into(),
            plan_file: "zoro_plan.md".into(),
        }
    }
}

/// Read access to the files of a rules directory, keyed by file name.
pub trait RuleStore: Send + Sync {
    /// Check if a rule file exists.
    fn exists(&self, name: &str) -> bool;

    /// Read a rule file as UTF-8 text.
    fn read(&self, name: &str) -> Result<String, RulesError>;
}

/// Rule files on the local filesystem.
pub struct FsRuleStore {
    dir: PathBuf,
}

impl FsRuleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at `<project_root>/<layout.dir>`.
    pub fn for_project(project_root: &Path, layout: &RulesLayout) -> Self {
        Self::new(project_root.join(&layout.dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn resolve(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl RuleStore for FsRuleStore {
    fn exists(&self, name: &str) -> bool {
        self.resolve(name).exists()
    }

    fn read(&self, name: &str) -> Result<String, RulesError> {
        let path = self.resolve(name);
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RulesError::NotFound(name.to_string()))
            }
            Err(source) => Err(RulesError::Read { path, source }),
        }
    }
}

/// Rule files held in memory, for hosts that source rules elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryRuleStore {
    files: BTreeMap<String, String>,
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.files.insert(name.into(), text.into());
        self
    }
}

impl RuleStore for MemoryRuleStore {
    fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    fn read(&self, name: &str) -> Result<String, RulesError> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| RulesError::NotFound(name.to_string()))
    }
}

/// Content of a rule file that is known to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleContent {
    Text(String),
    /// The file exists but could not be read.
    Unreadable { file_name: String },
}

/// What the probe found in a project's rules directory.
///
/// `integration == None` means the project has not opted in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulesBundle {
    pub integration: Option<RuleContent>,
    pub plan: Option<RuleContent>,
}

impl RulesBundle {
    pub fn is_enabled(&self) -> bool {
        self.integration.is_some()
    }
}

/// Probe a rules store for the two marker files.
///
/// The plan file is only looked at once the integration marker is confirmed.
pub fn probe(store: &dyn RuleStore, layout: &RulesLayout) -> RulesBundle {
    if !store.exists(&layout.integration_file) {
        debug!(file = %layout.integration_file, "no integration marker, skipping critical rules");
        return RulesBundle::default();
    }

    let integration = Some(load(store, &layout.integration_file));

    let plan = if store.exists(&layout.plan_file) {
        Some(load(store, &layout.plan_file))
    } else {
        debug!(file = %layout.plan_file, "no plan file (optional)");
        None
    };

    RulesBundle { integration, plan }
}

fn load(store: &dyn RuleStore, name: &str) -> RuleContent {
    match store.read(name) {
        Ok(text) => {
            debug!(file = name, chars = text.len(), "read rule file");
            RuleContent::Text(text)
        }
        Err(e) => {
            warn!(file = name, "failed to read rule file: {e}");
            RuleContent::Unreadable {
                file_name: name.to_string(),
            }
        }
    }
}
