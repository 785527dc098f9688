//! Process-wide content cache: adventures and the Boss Rush roster
//!
//! Loaded once at startup and shared read-only by every session.

use ahash::AHashMap;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::combat::{default_roster, roster_from_json, BossTemplate};
use crate::error::{Result, SiteRpgError};
use crate::quest::{adventures_from_json, builtin_adventures, Adventure};

/// Immutable game content
#[derive(Debug, Clone)]
pub struct ContentRegistry {
    adventures: AHashMap<String, Arc<Adventure>>,
    roster: Arc<Vec<BossTemplate>>,
}

impl ContentRegistry {
    /// Build from optional JSON overrides, falling back to built-in content
    pub fn load(adventures_json: Option<&str>, bosses_json: Option<&str>) -> Result<Self> {
        let adventures = match adventures_json {
            Some(json) => adventures_from_json(json)?,
            None => builtin_adventures()?,
        };
        let roster = match bosses_json {
            Some(json) => roster_from_json(json)?,
            None => default_roster(),
        };
        for adventure in adventures.values() {
            for issue in adventure.validate() {
                tracing::warn!(adventure = %adventure.id, %issue, "adventure scene graph is broken");
            }
        }

        Ok(Self {
            adventures: adventures
                .into_iter()
                .map(|(id, adventure)| (id, Arc::new(adventure)))
                .collect(),
            roster: Arc::new(roster),
        })
    }

    pub fn adventure(&self, id: &str) -> Result<Arc<Adventure>> {
        self.adventures
            .get(id)
            .cloned()
            .ok_or_else(|| SiteRpgError::AdventureNotFound(id.to_string()))
    }

    /// Adventure ids, sorted
    pub fn adventure_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.adventures.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn roster(&self) -> Arc<Vec<BossTemplate>> {
        self.roster.clone()
    }
}

/// Global content cache
static CONTENT: OnceCell<Arc<RwLock<ContentRegistry>>> = OnceCell::new();

/// Load content into the global cache, replacing whatever was there
pub fn init_content(adventures_json: Option<&str>, bosses_json: Option<&str>) -> Result<()> {
    let registry = ContentRegistry::load(adventures_json, bosses_json)?;
    tracing::info!(
        adventures = registry.adventures.len(),
        bosses = registry.roster.len(),
        "content initialized"
    );

    if let Some(existing) = CONTENT.get() {
        *existing.write() = registry;
    } else {
        let _ = CONTENT.set(Arc::new(RwLock::new(registry)));
    }
    Ok(())
}

pub fn is_content_initialized() -> bool {
    CONTENT.get().is_some()
}

/// Shared handle to the cached content
pub fn content() -> Result<Arc<RwLock<ContentRegistry>>> {
    CONTENT.get().cloned().ok_or(SiteRpgError::ContentNotInitialized)
}

/// Cached adventure; the built-in adventures stand in until content is
/// initialized
pub fn get_adventure(id: &str) -> Result<Arc<Adventure>> {
    match CONTENT.get() {
        Some(content) => content.read().adventure(id),
        None => builtin_adventure(id),
    }
}

/// Cached adventure ids, or the built-in ones, sorted
pub fn adventure_ids() -> Result<Vec<String>> {
    match CONTENT.get() {
        Some(content) => Ok(content.read().adventure_ids()),
        None => {
            let mut ids: Vec<String> = builtin_adventures()?.into_keys().collect();
            ids.sort();
            Ok(ids)
        }
    }
}

fn builtin_adventure(id: &str) -> Result<Arc<Adventure>> {
    builtin_adventures()?
        .remove(id)
        .map(Arc::new)
        .ok_or_else(|| SiteRpgError::AdventureNotFound(id.to_string()))
}

pub fn roster() -> Result<Arc<Vec<BossTemplate>>> {
    Ok(content()?.read().roster())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_builtins() {
        let registry = ContentRegistry::load(None, None).unwrap();
        assert_eq!(
            registry.adventure_ids(),
            vec!["cold_storage".to_string(), "dungeon_delve".to_string()]
        );
        assert_eq!(registry.roster().len(), default_roster().len());
        assert!(matches!(
            registry.adventure("nope"),
            Err(SiteRpgError::AdventureNotFound(_))
        ));
    }

    #[test]
    fn test_load_custom_adventures() {
        let json = r#"[{
            "id": "tiny",
            "title": "Tiny",
            "startingScene": "a",
            "scenes": {"a": {"id": "a", "isVictory": true}}
        }]"#;
        let registry = ContentRegistry::load(Some(json), None).unwrap();
        let tiny = registry.adventure("tiny").unwrap();
        assert_eq!(tiny.starting_scene, "a");
        assert!(registry.adventure("dungeon_delve").is_err());
    }

    #[test]
    fn test_empty_roster_rejected() {
        let err = ContentRegistry::load(None, Some("[]")).unwrap_err();
        assert!(matches!(err, SiteRpgError::EmptyRoster));
    }

    #[test]
    fn test_bad_json_rejected() {
        let err = ContentRegistry::load(Some("{not json"), None).unwrap_err();
        assert!(matches!(err, SiteRpgError::DeserializationError(_)));
    }

    #[test]
    fn test_builtin_adventure_fallback() {
        let delve = builtin_adventure("dungeon_delve").unwrap();
        assert_eq!(delve.starting_scene, "entrance");
        assert!(matches!(
            builtin_adventure("nope"),
            Err(SiteRpgError::AdventureNotFound(_))
        ));
    }

    #[test]
    fn test_global_cache() {
        init_content(None, None).unwrap();
        assert!(is_content_initialized());
        assert!(get_adventure("dungeon_delve").is_ok());
        assert_eq!(adventure_ids().unwrap(), vec!["cold_storage".to_string(), "dungeon_delve".to_string()]);
        assert!(!roster().unwrap().is_empty());
    }
}
