//! Fact sheet commands.
//!
//! # Usage
//!
//! ```bash
//! # Validate a fact sheet before pointing ASSISTANT_FACTS_PATH at it
//! as-cli facts check facts.yaml
//!
//! # Print the context the generation service would receive
//! as-cli facts context --lang fr facts.yaml
//! ```

use std::path::Path;

use autoservice_core::Language;
use autoservice_storefront::assistant::{FactSheet, FactSheetError, prompt};

/// Load and validate a fact sheet, logging a summary.
///
/// # Errors
///
/// Returns `FactSheetError` if the file cannot be read or parsed, or if
/// validation fails. `Invalid` carries every problem found.
pub fn check(path: &Path) -> Result<FactSheet, FactSheetError> {
    let facts = FactSheet::load(path).inspect_err(|e| {
        if let FactSheetError::Invalid(problems) = e {
            for problem in problems {
                tracing::error!(path = %path.display(), "{problem}");
            }
        }
    })?;

    tracing::info!(
        name = %facts.name,
        services = facts.services.len(),
        prices = facts.prices.len(),
        "Fact sheet OK: {}",
        path.display()
    );
    Ok(facts)
}

/// Render the system context for `lang` from `path`, or from the built-in
/// sheet when no path is given.
///
/// # Errors
///
/// Returns `FactSheetError` if the file cannot be loaded.
pub fn context(path: Option<&Path>, lang: Language) -> Result<String, FactSheetError> {
    let facts = match path {
        Some(path) => FactSheet::load(path)?,
        None => FactSheet::default(),
    };
    Ok(prompt::system_context(&facts, lang))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_file(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("as-cli-facts-{}.yaml", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_check_reports_every_problem() {
        let path = temp_file(
            "name: ''\ndescription: d\nowner: {name: o, phone: ''}\naddress: a\nhours: h\nservices: []\nprices: []\n",
        );

        let Err(FactSheetError::Invalid(problems)) = check(&path) else {
            panic!("expected validation failure");
        };
        assert!(problems.len() >= 2);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_check_missing_file() {
        let path = std::env::temp_dir().join("as-cli-facts-does-not-exist.yaml");
        assert!(matches!(check(&path), Err(FactSheetError::Io(_))));
    }

    #[test]
    fn test_context_uses_builtin_sheet() {
        let context = context(None, Language::En).unwrap();
        assert!(context.contains("AutoService BL"));
        assert!(context.contains("+212 776270650"));
    }
}
