// ============================================================================
// CREDENTIAL STORE - Token bearer opaco
// ============================================================================
// save/load sin validación ni expiración. `load() == None` significa
// "no autenticado", no es un error.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use gloo_storage::{SessionStorage, Storage};
use crate::error::StorageError;
use crate::utils::constants::STORAGE_KEY_TOKEN;

pub trait CredentialStore {
    fn save(&self, token: &str) -> Result<(), StorageError>;
    fn load(&self) -> Option<String>;
}

impl<S: CredentialStore + ?Sized> CredentialStore for Rc<S> {
    fn save(&self, token: &str) -> Result<(), StorageError> {
        (**self).save(token)
    }

    fn load(&self) -> Option<String> {
        (**self).load()
    }
}

/// Token en sessionStorage del navegador (clave `token`, valor sin comillas)
#[derive(Clone, Debug, Default)]
pub struct SessionStorageCredentials;

impl SessionStorageCredentials {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialStore for SessionStorageCredentials {
    fn save(&self, token: &str) -> Result<(), StorageError> {
        // raw(): el token se guarda tal cual, sin serializar a JSON
        SessionStorage::raw()
            .set_item(STORAGE_KEY_TOKEN, token)
            .map_err(|e| StorageError::Write(format!("{:?}", e)))?;
        log::info!("💾 [AUTH] Token guardado en sessionStorage");
        Ok(())
    }

    fn load(&self) -> Option<String> {
        match SessionStorage::raw().get_item(STORAGE_KEY_TOKEN) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                log::warn!("⚠️ [AUTH] No se pudo leer sessionStorage: {:?}", e);
                None
            }
        }
    }
}

/// Token en memoria (tests y entornos sin storage)
#[derive(Clone, Debug, Default)]
pub struct MemoryCredentials {
    token: Rc<RefCell<Option<String>>>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        *store.token.borrow_mut() = Some(token.to_string());
        store
    }
}

impl CredentialStore for MemoryCredentials {
    fn save(&self, token: &str) -> Result<(), StorageError> {
        *self.token.borrow_mut() = Some(token.to_string());
        Ok(())
    }

    fn load(&self) -> Option<String> {
        self.token.borrow().clone().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_and_treats_empty_as_absent() {
        let store = MemoryCredentials::new();
        assert_eq!(store.load(), None);

        store.save("abc.def").unwrap();
        assert_eq!(store.load().as_deref(), Some("abc.def"));

        store.save("").unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn shared_store_sees_the_same_token() {
        let store = Rc::new(MemoryCredentials::new());
        let reader = store.clone();
        store.save("tok").unwrap();
        assert_eq!(reader.load().as_deref(), Some("tok"));
    }
}
