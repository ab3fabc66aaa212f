//! Company profile persistence.

use consultia_core::Company;

use crate::error::ClientError;
use crate::store::{load_json, save_json, LocalStore, PROFILE_KEY};

/// Company profile backed by a [`LocalStore`].
pub struct ProfileStore<S: LocalStore> {
    store: S,
}

impl<S: LocalStore> ProfileStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stored profile, or the default one when missing or corrupt.
    pub fn load(&self) -> Company {
        load_json(&self.store, PROFILE_KEY).unwrap_or_default()
    }

    pub fn save(&self, company: &Company) -> Result<(), ClientError> {
        save_json(&self.store, PROFILE_KEY, company)
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        self.store.remove(PROFILE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use consultia_core::CompanySize;

    #[test]
    fn test_load_defaults_when_missing_or_corrupt() {
        let store = MemoryStore::new();
        let profiles = ProfileStore::new(&store);
        assert_eq!(profiles.load(), Company::default());

        store.set(PROFILE_KEY, "{broken").unwrap();
        assert_eq!(profiles.load(), Company::default());
    }

    #[test]
    fn test_save_and_clear() {
        let store = MemoryStore::new();
        let profiles = ProfileStore::new(&store);
        let company = Company {
            name: "Padaria Pão Quente".into(),
            owner_name: "Marta".into(),
            size: CompanySize::Pequena,
            ..Default::default()
        };

        profiles.save(&company).unwrap();
        assert_eq!(profiles.load(), company);
        assert!(store.get(PROFILE_KEY).unwrap().unwrap().contains("\"ownerName\""));

        profiles.clear().unwrap();
        assert_eq!(profiles.load(), Company::default());
    }
}
