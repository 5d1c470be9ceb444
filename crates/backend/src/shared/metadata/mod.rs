pub mod entity_registry;
pub mod references;

use once_cell::sync::OnceCell;

pub use entity_registry::{display_label, EntityRegistry};
pub use references::resolve_reference_targets;

static REGISTRY: OnceCell<EntityRegistry> = OnceCell::new();

/// Build the process-wide registry; fails on schema defects
pub fn initialize_registry() -> anyhow::Result<&'static EntityRegistry> {
    let registry = EntityRegistry::new()?;
    REGISTRY
        .set(registry)
        .map_err(|_| anyhow::anyhow!("Entity registry already initialized"))?;
    Ok(get_registry())
}

pub fn get_registry() -> &'static EntityRegistry {
    REGISTRY
        .get()
        .expect("Entity registry has not been initialized")
}
