// Session - the catalog and garden of one run, plus where the catalog lives
//
// Owned by main and handed to the UI or CLI by reference. Nothing else holds
// application state.

use crate::catalog::{parse_rate, Catalog, CatalogSource, Registration};
use crate::config::Config;
use crate::error::SessionError;
use crate::garden::{Garden, GardenStats, Removal};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct Session {
    catalog: Catalog,
    garden: Garden,
    catalog_path: PathBuf,
    source: CatalogSource,
}

impl Session {
    /// Session with an empty garden over a catalog the caller loaded itself
    pub fn new(catalog: Catalog, catalog_path: impl Into<PathBuf>) -> Self {
        Session {
            catalog,
            garden: Garden::new(),
            catalog_path: catalog_path.into(),
            source: CatalogSource::File,
        }
    }

    /// Load the catalog from the configured path (defaults on failure)
    ///
    /// After a fallback the session refuses to save, so the unreadable file
    /// is left as it was.
    pub fn open(config: &Config) -> (Self, CatalogSource) {
        let (catalog, source) = Catalog::load_or_default(&config.catalog_path);
        let mut session = Self::new(catalog, config.catalog_path.clone());
        session.source = source.clone();
        (session, source)
    }

    /// Plant one tree of a catalog type; returns its new count
    pub fn add(&mut self, name: &str) -> Result<u32, SessionError> {
        let tree = self
            .catalog
            .get(name)
            .ok_or_else(|| SessionError::UnknownTree(name.to_string()))?;

        let count = self.garden.increment(tree);
        debug!(name, count, "tree planted");
        Ok(count)
    }

    /// Remove one tree; unknown names are ignored
    pub fn remove(&mut self, name: &str) -> Removal {
        let removal = self.garden.decrement(name);
        debug!(name, ?removal, "tree removed");
        removal
    }

    /// Uproot everything; the catalog is untouched
    pub fn clear_garden(&mut self) {
        self.garden.clear();
        debug!("garden cleared");
    }

    pub fn register(&mut self, name: &str, rate: f64) -> Result<Registration, SessionError> {
        Ok(self.catalog.register(name, rate)?)
    }

    /// Two-step "new tree" flow over raw user input
    ///
    /// `None` or a blank name aborts before the rate is looked at. A rate
    /// that is missing or not a number aborts without registering.
    pub fn register_from_input(
        &mut self,
        name: Option<&str>,
        rate: Option<&str>,
    ) -> Result<Registration, SessionError> {
        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => return Err(SessionError::Aborted),
        };

        let rate = rate.ok_or(SessionError::Aborted)?;
        let rate = parse_rate(rate)?;

        self.register(name, rate)
    }

    /// Overwrite the catalog file with the current catalog
    pub fn save(&self) -> Result<(), SessionError> {
        if let CatalogSource::Fallback { reason } = &self.source {
            return Err(SessionError::UnsafeOverwrite {
                path: self.catalog_path.clone(),
                reason: reason.clone(),
            });
        }

        Ok(self.catalog.save(&self.catalog_path)?)
    }

    /// Where the catalog came from
    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    pub fn stats(&self) -> GardenStats {
        self.garden.aggregate()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn garden(&self) -> &Garden {
        &self.garden
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use tempfile::TempDir;

    fn session() -> Session {
        Session::new(Catalog::defaults(), "unused.json")
    }

    #[test]
    fn test_add_and_stats() {
        let mut session = session();
        session.add("Oak").unwrap();
        session.add("Oak").unwrap();
        assert_eq!(session.add("Oak").unwrap(), 3);
        session.add("Pine").unwrap();

        let stats = session.stats();
        assert_eq!(stats.total_count, 4);
        assert_eq!(stats.total_rate, 86.0);
    }

    #[test]
    fn test_add_unknown_tree_fails() {
        let mut session = session();
        assert!(matches!(
            session.add("Baobab"),
            Err(SessionError::UnknownTree(name)) if name == "Baobab"
        ));
        assert!(session.garden().is_empty());
    }

    #[test]
    fn test_clear_garden_keeps_catalog() {
        let mut session = session();
        session.add("Oak").unwrap();
        session.add("Pine").unwrap();

        session.clear_garden();
        assert_eq!(session.stats(), GardenStats::default());
        assert_eq!(session.catalog(), &Catalog::defaults());
    }

    #[test]
    fn test_remove_unknown_is_ignored() {
        let mut session = session();
        session.add("Oak").unwrap();

        assert_eq!(session.remove("Baobab"), Removal::Ignored);
        assert_eq!(session.stats().total_count, 1);
    }

    #[test]
    fn test_registered_tree_is_selectable_and_counted() {
        let mut session = session();
        session.register("Redwood", 30.0).unwrap();
        assert!(session.catalog().contains("Redwood"));

        let before = session.stats().total_rate;
        session.add("Redwood").unwrap();
        assert_eq!(session.stats().total_rate - before, 30.0);
    }

    #[test]
    fn test_reregister_leaves_planted_rate_alone() {
        let mut session = session();
        session.add("Oak").unwrap();
        session.register("Oak", 50.0).unwrap();

        assert_eq!(session.stats().total_rate, 22.0);

        session.remove("Oak");
        session.add("Oak").unwrap();
        assert_eq!(session.stats().total_rate, 50.0);
    }

    #[test]
    fn test_register_from_input_aborts() {
        let mut session = session();

        assert!(matches!(
            session.register_from_input(None, Some("30")),
            Err(SessionError::Aborted)
        ));
        assert!(matches!(
            session.register_from_input(Some("  "), Some("30")),
            Err(SessionError::Aborted)
        ));
        assert!(matches!(
            session.register_from_input(Some("Redwood"), None),
            Err(SessionError::Aborted)
        ));
        assert!(matches!(
            session.register_from_input(Some("Redwood"), Some("tall")),
            Err(SessionError::Catalog(CatalogError::InvalidRate(_)))
        ));
        assert!(!session.catalog().contains("Redwood"));
    }

    #[test]
    fn test_register_from_input_success() {
        let mut session = session();
        let registration = session
            .register_from_input(Some(" Redwood "), Some("30.0"))
            .unwrap();

        assert_eq!(registration, Registration::Added);
        assert_eq!(session.catalog().get("Redwood").unwrap().rate(), 30.0);
    }

    #[test]
    fn test_open_save_reopen() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            catalog_path: dir.path().join("trees.json"),
        };

        let (mut session, source) = Session::open(&config);
        assert_eq!(source, CatalogSource::Defaults);

        session.register("Redwood", 30.0).unwrap();
        session.save().unwrap();

        let (reopened, source) = Session::open(&config);
        assert_eq!(source, CatalogSource::File);
        assert_eq!(reopened.catalog(), session.catalog());
        assert!(reopened.garden().is_empty());
    }

    #[test]
    fn test_unreadable_catalog_is_never_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trees.json");
        let original = r#"{"Redwood":{"rate":30.0},"Cedar":{"rate":"12"}}"#;
        std::fs::write(&path, original).unwrap();

        let config = Config {
            catalog_path: path.clone(),
        };
        let (mut session, source) = Session::open(&config);
        assert!(matches!(source, CatalogSource::Fallback { .. }));
        assert_eq!(session.source(), &source);

        // Usable with the built-in trees, but saving is refused
        session.add("Oak").unwrap();
        session.register("Birch", 25.0).unwrap();
        assert!(matches!(
            session.save(),
            Err(SessionError::UnsafeOverwrite { .. })
        ));

        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let session = Session::new(Catalog::defaults(), dir.path().join("nope").join("trees.json"));

        assert!(matches!(
            session.save(),
            Err(SessionError::Catalog(CatalogError::Write { .. }))
        ));
    }
}
