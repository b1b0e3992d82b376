//! YAML output formatter

use super::FormatError;
use serde::Serialize;

/// Format any serializable value as YAML
pub fn format_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, FormatError> {
    serde_yaml::to_string(data).map_err(FormatError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breadcrumbs::resolve;

    #[test]
    fn test_format_yaml() {
        let trail = resolve("/aluno/treinos/3", None);
        let yaml = format_yaml(&trail).unwrap();

        assert!(yaml.contains("requested_path:"));
        assert!(yaml.contains("items:"));
        assert!(yaml.contains("Meus Treinos"));
        assert!(!yaml.contains("role:"));
    }
}
