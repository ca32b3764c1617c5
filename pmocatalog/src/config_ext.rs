//! Extension de pmoconfig pour le catalogue

use serde_yaml::Value;

const DEFAULT_API_NAME: &str = "v1";

/// Trait d'extension pour pmoconfig::Config
pub trait CatalogConfigExt {
    /// Pré-remplir le catalogue au démarrage (`catalog.seed_defaults`)
    fn catalog_seed_defaults(&self) -> bool;

    /// Nom de montage de l'API : routes servies sous `/api/{name}` (`catalog.api_name`)
    fn catalog_api_name(&self) -> String;
}

impl CatalogConfigExt for pmoconfig::Config {
    fn catalog_seed_defaults(&self) -> bool {
        match self.get_value(&["catalog", "seed_defaults"]) {
            Ok(Value::Bool(b)) => b,
            _ => true,
        }
    }

    fn catalog_api_name(&self) -> String {
        match self.get_value(&["catalog", "api_name"]) {
            Ok(Value::String(s)) if !s.trim().is_empty() => s.trim().trim_matches('/').to_string(),
            _ => DEFAULT_API_NAME.to_string(),
        }
    }
}
