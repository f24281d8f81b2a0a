//! The unit of work run on a blocking worker for one module

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use boot_meta::ModuleTypeRegistry;

use crate::error::ModuleError;
use crate::naming::derive_module_name;
use crate::reference::{ModuleReference, canonicalize};
use crate::resolver::{CloneResult, panic_message};
use crate::source::ModuleSources;

/// Everything a fetch task needs. Cheap to clone into each task.
#[derive(Debug, Clone)]
pub(crate) struct FetchContext {
    pub(crate) registry: Arc<ModuleTypeRegistry>,
    pub(crate) sources: ModuleSources,
}

/// Read the manifest, pick the destination, and materialize and install the
/// module unless the destination is already taken.
pub(crate) fn fetch_module(
    ctx: &FetchContext,
    reference: &ModuleReference,
) -> Result<CloneResult, ModuleError> {
    let manifest = match ctx.sources.manifests.get_manifest(reference) {
        Ok(Some(manifest)) => manifest,
        Ok(None) => {
            return Err(ModuleError::Manifest {
                reference: reference.to_string(),
                reason: "no manifest found".to_string(),
            });
        }
        Err(e) => {
            return Err(ModuleError::Manifest {
                reference: reference.to_string(),
                reason: e.to_string(),
            });
        }
    };

    let entry = ctx
        .registry
        .entry(&manifest.module_type)
        .ok_or_else(|| ModuleError::UnknownType {
            reference: reference.to_string(),
            module_type: manifest.module_type.clone(),
        })?;

    let identity = ctx
        .sources
        .fetcher
        .identity(reference)
        .map_err(|e| fetch_error(reference, e))?;
    let name = derive_module_name(&identity.name);
    if name.is_empty() {
        return Err(ModuleError::Fetch {
            reference: reference.to_string(),
            message: format!("cannot derive a module name from '{}'", identity.name),
        });
    }
    let destination = entry.destination_root.join(&name);
    let canonical_url = canonicalize(&manifest, &identity);

    let claimed = boot_fs::claim_dir(&destination).map_err(|e| fetch_error(reference, e))?;
    if claimed {
        tracing::info!(reference = %reference, destination = %destination.display(), "Cloning module");
        let claim = Claim::new(&destination);
        ctx.sources
            .fetcher
            .materialize(reference, &destination)
            .map_err(|e| fetch_error(reference, e))?;
        claim.keep();
        install(ctx, reference, &destination);
    } else {
        tracing::info!(reference = %reference, destination = %destination.display(), "Destination exists, skipping clone");
    }

    Ok(CloneResult {
        canonical_url,
        destination,
        requirements: manifest.requirements,
        module_type: entry.name.clone(),
        name,
        materialized: claimed,
    })
}

/// Run the installer for a freshly materialized module. Neither an error
/// nor a panic in the installer fails the module.
fn install(ctx: &FetchContext, reference: &ModuleReference, destination: &Path) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        ctx.sources.installer.install(destination)
    }));
    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(reference = %reference, error = %e, "Install step failed");
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref()).unwrap_or("no message");
            tracing::warn!(reference = %reference, error = %message, "Install step panicked");
        }
    }
}

fn fetch_error(reference: &ModuleReference, err: impl std::fmt::Display) -> ModuleError {
    ModuleError::Fetch {
        reference: reference.to_string(),
        message: err.to_string(),
    }
}

/// A destination claimed by this task. Dropping it without [`Claim::keep`]
/// removes the directory, whether the clone returned an error or panicked,
/// so a later run can try again.
struct Claim<'a> {
    destination: &'a Path,
    kept: bool,
}

impl<'a> Claim<'a> {
    fn new(destination: &'a Path) -> Self {
        Self {
            destination,
            kept: false,
        }
    }

    fn keep(mut self) {
        self.kept = true;
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        if self.kept {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(self.destination) {
            tracing::warn!(destination = %self.destination.display(), error = %e, "Failed to remove partial clone");
        }
    }
}
