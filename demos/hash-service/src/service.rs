use crate::store::{HashRecord, HashStore};
use injectra::DeriveInjectable as Injectable;
use md5::Md5;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Stateless digest computation.
#[derive(Injectable)]
#[injectable(scope = "singleton")]
pub struct Hasher;

impl Hasher {
    pub fn compute(&self, text: &str, algorithm: &str) -> Result<String, String> {
        match algorithm {
            "sha256" => Ok(hex::encode(Sha256::digest(text.as_bytes()))),
            "md5" => Ok(hex::encode(Md5::digest(text.as_bytes()))),
            other => Err(format!("Unsupported algorithm: {}", other)),
        }
    }
}

/// Per-request facade over the store and the hasher.
#[derive(Injectable)]
pub struct HashDbService {
    store: Arc<HashStore>,
    hasher: Arc<Hasher>,
}

impl HashDbService {
    pub fn create(&self, text: &str, algorithm: &str) -> Result<HashRecord, String> {
        let digest = self.hasher.compute(text, algorithm)?;
        self.store.insert(text, algorithm, digest)
    }

    pub fn get(&self, id: u64) -> Option<HashRecord> {
        self.store.get(id)
    }

    pub fn get_by_input(&self, text: &str) -> Option<HashRecord> {
        self.store.find_by_input(text)
    }

    pub fn list(&self) -> Vec<HashRecord> {
        self.store.list()
    }

    /// Recompute a stored input with another algorithm.
    ///
    /// `Ok(None)` means there is no row with that id.
    pub fn update(&self, id: u64, algorithm: &str) -> Result<Option<HashRecord>, String> {
        let Some(record) = self.store.get(id) else {
            return Ok(None);
        };
        let digest = self.hasher.compute(&record.input, algorithm)?;
        Ok(self.store.update(id, algorithm, digest))
    }

    pub fn delete(&self, id: u64) -> bool {
        self.store.delete(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use injectra::{Container, Scope};

    #[test]
    fn test_known_digests() {
        let hasher = Hasher;
        assert_eq!(
            hasher.compute("abc", "md5").unwrap(),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(
            hasher.compute("abc", "sha256").unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(hasher.compute("abc", "crc32").is_err());
    }

    #[test]
    fn test_services_share_the_store() {
        let mut container = Container::new();
        container.register::<HashStore>(Scope::Singleton).unwrap();
        container.register::<HashDbService>(Scope::Transient).unwrap();

        let first = container.resolve::<HashDbService>().unwrap();
        let record = first.create("abc", "md5").unwrap();

        let second = container.resolve::<HashDbService>().unwrap();
        assert_eq!(second.get(record.id).unwrap().digest, record.digest);
        assert!(second.create("abc", "sha256").is_err());
    }

    #[test]
    fn test_update_and_lookup_by_input() {
        let container = Container::new();
        let service = container.resolve::<HashDbService>().unwrap();
        let record = service.create("abc", "md5").unwrap();

        let updated = service.update(record.id, "sha256").unwrap().unwrap();
        assert_eq!(updated.algorithm, "sha256");
        assert_eq!(
            updated.digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(service.get_by_input("abc").unwrap().digest, updated.digest);

        assert!(service.update(record.id, "crc32").is_err());
        assert!(service.update(999, "md5").unwrap().is_none());
        assert!(service.get_by_input("missing").is_none());
    }
}
