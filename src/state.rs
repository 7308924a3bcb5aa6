use parking_lot::RwLock;

use crate::config::{self, PetsConfig};
use crate::pets::{
    collection_from_memento, collection_to_memento, PetMemento, PetSpecification,
};

/// File holding the spawned-pet memento (two parallel arrays, see
/// `PetMemento`). The analogue of the host's persisted key-value store.
pub(crate) const MEMENTO_FILE: &str = "extra-pets.json";

/// Global state shared across commands.
pub(crate) struct AppState {
    /// Cached PetsConfig to avoid re-reading from disk on every command
    pub(crate) config: RwLock<PetsConfig>,
    /// Extra pets spawned this and previous sessions
    pub(crate) collection: RwLock<Vec<PetSpecification>>,
    /// Spec the pet panel was last rendered with (None = no panel yet)
    pub(crate) panel_spec: RwLock<Option<PetSpecification>>,
}

impl AppState {
    /// Build state from disk: cached config plus the persisted collection,
    /// restored at the currently configured size.
    pub(crate) fn load() -> Self {
        let config: PetsConfig = config::load_json_config(config::PETS_CONFIG_FILE);
        let memento: PetMemento = config::load_json_config(MEMENTO_FILE);
        let collection = collection_from_memento(&memento, config.pet_size);
        Self {
            config: RwLock::new(config),
            collection: RwLock::new(collection),
            panel_spec: RwLock::new(None),
        }
    }

    pub(crate) fn new(config: PetsConfig, collection: Vec<PetSpecification>) -> Self {
        Self {
            config: RwLock::new(config),
            collection: RwLock::new(collection),
            panel_spec: RwLock::new(None),
        }
    }

    /// Append a pet to the collection and persist the memento.
    pub(crate) fn push_pet(&self, spec: PetSpecification) -> Result<(), String> {
        let mut collection = self.collection.write();
        collection.push(spec);
        config::save_json_config(MEMENTO_FILE, &collection_to_memento(&collection))
    }

    /// Drop all spawned pets and clear the persisted memento.
    pub(crate) fn clear_pets(&self) -> Result<(), String> {
        self.collection.write().clear();
        config::save_json_config(MEMENTO_FILE, &PetMemento::default())
    }

    pub(crate) fn collection_snapshot(&self) -> Vec<PetSpecification> {
        self.collection.read().clone()
    }
}
