use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;

/// High-level persistence operations: portfolio ⇄ JSON, plus native file I/O.
///
/// The JSON is a plain key-value document — dates as ISO-8601 strings,
/// numbers as doubles — so any surrounding collaborator (browser storage,
/// a file, a database column) can hold it without format knowledge.
pub struct StorageManager;

impl StorageManager {
    /// Serialize a portfolio to pretty-printed JSON.
    pub fn to_json(portfolio: &Portfolio) -> Result<String, CoreError> {
        serde_json::to_string_pretty(portfolio)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize portfolio: {e}")))
    }

    /// Deserialize a portfolio from JSON.
    pub fn from_json(json: &str) -> Result<Portfolio, CoreError> {
        serde_json::from_str(json)
            .map_err(|e| CoreError::Deserialization(format!("Failed to parse portfolio: {e}")))
    }

    /// Save a portfolio to a JSON file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(portfolio: &Portfolio, path: &str) -> Result<(), CoreError> {
        let json = Self::to_json(portfolio)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a portfolio from a JSON file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<Portfolio, CoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
