use crate::errors::CoreError;

/// Injected persistence seam.
///
/// The core never reaches into ambient storage; the surrounding application
/// hands it something that can hold one JSON document — browser local
/// storage, a file, a test buffer. Durability and timing are the
/// collaborator's problem.
pub trait PortfolioStore {
    /// Load the stored document, or `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<String>, CoreError>;

    /// Persist the document, replacing any previous contents.
    fn save(&mut self, json: &str) -> Result<(), CoreError>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    contents: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PortfolioStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, CoreError> {
        Ok(self.contents.clone())
    }

    fn save(&mut self, json: &str) -> Result<(), CoreError> {
        self.contents = Some(json.to_string());
        Ok(())
    }
}
