use crate::model::{Client, DataFileError};
use crate::storage::read_json_file;

/// Read-only client records loaded from `clients.json`.
#[derive(Debug, Clone, Default)]
pub struct ClientDirectory {
    clients: Vec<Client>,
}

impl ClientDirectory {
    pub fn new(clients: Vec<Client>) -> Self {
        Self { clients }
    }

    pub fn load(path: &str) -> Result<Self, DataFileError> {
        Ok(Self::new(read_json_file(path)?))
    }

    pub fn all(&self) -> &[Client] {
        &self.clients
    }

    pub fn find_by_code(&self, code: &str) -> Option<&Client> {
        let code = code.trim().to_lowercase();
        self.clients
            .iter()
            .find(|c| c.code.to_lowercase() == code)
    }

    pub fn find_by_district(&self, district: &str) -> Vec<&Client> {
        self.clients
            .iter()
            .filter(|c| c.district.to_lowercase() == district.to_lowercase())
            .collect()
    }

    pub fn find_by_city(&self, city: &str) -> Vec<&Client> {
        self.clients
            .iter()
            .filter(|c| c.city.to_lowercase() == city.to_lowercase())
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn fixture_clients() -> ClientDirectory {
    let clients: Vec<Client> =
        serde_json::from_str(include_str!("../../data/database/clients.json")).unwrap();
    ClientDirectory::new(clients)
}
