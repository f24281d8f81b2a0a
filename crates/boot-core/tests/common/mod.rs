//! In-memory collaborators that record how the resolver drives them.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use boot_core::{
    Error, FetchExecutor, InstallError, Installer, ManifestSource, ModuleReference, ModuleSources,
    NoopInstaller, Resolver, Result,
};
use boot_git::RepoIdentity;
use boot_meta::{ModuleManifest, ModuleTypeDef, ModuleTypeRegistry};
use tempfile::TempDir;

#[derive(Debug, Clone)]
enum Behaviour {
    Manifest(ModuleManifest),
    NoManifest,
    ManifestError,
    Panic,
}

#[derive(Debug, Clone)]
struct FakeModule {
    behaviour: Behaviour,
    repo_name: String,
    fail_materialize: bool,
    panic_materialize: bool,
}

/// Manifest source and fetch executor over a fixed module table.
///
/// Unknown references behave like repositories without a manifest.
#[derive(Debug, Default)]
pub struct FakeSource {
    modules: HashMap<String, FakeModule>,
    delay: Duration,
    manifest_calls: Mutex<Vec<String>>,
    materialized: Mutex<Vec<String>>,
    intervals: Mutex<Vec<(String, Instant, Instant)>>,
    running: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time each manifest lookup takes.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// A module whose repository name is the last path segment.
    pub fn module(self, reference: &str, module_type: &str, requirements: &[&str]) -> Self {
        let manifest = ModuleManifest::new(module_type).with_requirements(requirements.iter().copied());
        self.with_manifest(reference, manifest)
    }

    pub fn with_manifest(mut self, reference: &str, manifest: ModuleManifest) -> Self {
        self.insert(reference, Behaviour::Manifest(manifest));
        self
    }

    pub fn renamed(mut self, reference: &str, repo_name: &str) -> Self {
        if let Some(module) = self.modules.get_mut(reference) {
            module.repo_name = repo_name.to_string();
        }
        self
    }

    pub fn without_manifest(mut self, reference: &str) -> Self {
        self.insert(reference, Behaviour::NoManifest);
        self
    }

    pub fn broken_manifest(mut self, reference: &str) -> Self {
        self.insert(reference, Behaviour::ManifestError);
        self
    }

    pub fn panicking(mut self, reference: &str) -> Self {
        self.insert(reference, Behaviour::Panic);
        self
    }

    pub fn failing_clone(mut self, reference: &str) -> Self {
        if let Some(module) = self.modules.get_mut(reference) {
            module.fail_materialize = true;
        }
        self
    }

    /// Materialization writes a partial file and then panics.
    pub fn panicking_clone(mut self, reference: &str) -> Self {
        if let Some(module) = self.modules.get_mut(reference) {
            module.panic_materialize = true;
        }
        self
    }

    fn insert(&mut self, reference: &str, behaviour: Behaviour) {
        let repo_name = reference.rsplit('/').next().unwrap_or(reference).to_string();
        self.modules.insert(
            reference.to_string(),
            FakeModule {
                behaviour,
                repo_name,
                fail_materialize: false,
                panic_materialize: false,
            },
        );
    }

    /// References passed to `get_manifest`, one entry per dispatch.
    pub fn dispatched(&self) -> Vec<String> {
        self.manifest_calls.lock().unwrap().clone()
    }

    pub fn dispatch_count(&self, reference: &str) -> usize {
        self.dispatched().iter().filter(|r| *r == reference).count()
    }

    pub fn materialized(&self) -> Vec<String> {
        self.materialized.lock().unwrap().clone()
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// `(reference, start, end)` of every manifest lookup.
    pub fn intervals(&self) -> Vec<(String, Instant, Instant)> {
        self.intervals.lock().unwrap().clone()
    }
}

impl ManifestSource for FakeSource {
    fn get_manifest(&self, reference: &ModuleReference) -> Result<Option<ModuleManifest>> {
        let start = Instant::now();
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.manifest_calls
            .lock()
            .unwrap()
            .push(reference.as_str().to_string());
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        self.running.fetch_sub(1, Ordering::SeqCst);
        self.intervals
            .lock()
            .unwrap()
            .push((reference.as_str().to_string(), start, Instant::now()));

        match self.modules.get(reference.as_str()).map(|m| &m.behaviour) {
            Some(Behaviour::Manifest(manifest)) => Ok(Some(manifest.clone())),
            Some(Behaviour::ManifestError) => Err(Error::source_failure("connection reset")),
            Some(Behaviour::Panic) => panic!("fake source exploded on {reference}"),
            Some(Behaviour::NoManifest) | None => Ok(None),
        }
    }
}

impl FetchExecutor for FakeSource {
    fn identity(&self, reference: &ModuleReference) -> Result<RepoIdentity> {
        let name = self
            .modules
            .get(reference.as_str())
            .map(|m| m.repo_name.clone())
            .unwrap_or_default();
        let owner = reference.as_str().split('/').next().unwrap_or("").to_string();
        let url = format!("https://host/{owner}/{name}");
        Ok(RepoIdentity::new(owner, name, url))
    }

    fn materialize(&self, reference: &ModuleReference, destination: &Path) -> Result<()> {
        self.materialized
            .lock()
            .unwrap()
            .push(reference.as_str().to_string());

        let module = &self.modules[reference.as_str()];
        if module.fail_materialize {
            std::fs::write(destination.join("partial"), "x")?;
            return Err(Error::source_failure("remote hung up"));
        }
        if module.panic_materialize {
            std::fs::write(destination.join("partial"), "x")?;
            panic!("clone of {reference} blew up");
        }
        if let Behaviour::Manifest(manifest) = &module.behaviour {
            std::fs::write(destination.join("init.yaml"), render_manifest(manifest))?;
        }
        Ok(())
    }
}

fn render_manifest(manifest: &ModuleManifest) -> String {
    let mut yaml = format!("type: {}\nrequirements:\n", manifest.module_type);
    for requirement in &manifest.requirements {
        yaml.push_str(&format!("  - '{requirement}'\n"));
    }
    if manifest.requirements.is_empty() {
        yaml = format!("type: {}\nrequirements: []\n", manifest.module_type);
    }
    yaml
}

/// Installer that always fails and counts its calls.
#[derive(Debug, Default)]
pub struct FailingInstaller {
    pub calls: AtomicUsize,
}

impl Installer for FailingInstaller {
    fn install(&self, destination: &Path) -> std::result::Result<(), InstallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(InstallError::Failed {
            path: destination.to_path_buf(),
            status: "exit status: 1".to_string(),
            stderr: "no matching distribution".to_string(),
        })
    }
}

/// Installer that panics and counts its calls.
#[derive(Debug, Default)]
pub struct PanickingInstaller {
    pub calls: AtomicUsize,
}

impl Installer for PanickingInstaller {
    fn install(&self, destination: &Path) -> std::result::Result<(), InstallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        panic!("installer crashed in {}", destination.display());
    }
}

/// A project root with the built-in module types registered.
pub struct Harness {
    pub root: TempDir,
    pub registry: Arc<ModuleTypeRegistry>,
    pub source: Arc<FakeSource>,
}

impl Harness {
    pub fn new(source: FakeSource) -> Self {
        let root = TempDir::new().unwrap();
        let registry =
            Arc::new(ModuleTypeRegistry::build(root.path(), &ModuleTypeDef::builtins()).unwrap());
        Self {
            root,
            registry,
            source: Arc::new(source),
        }
    }

    pub fn sources(&self) -> ModuleSources {
        ModuleSources::from_source(Arc::clone(&self.source), Arc::new(NoopInstaller))
    }

    pub fn resolver(&self, max_workers: usize) -> Resolver {
        Resolver::new(Arc::clone(&self.registry), self.sources(), max_workers).unwrap()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }
}
