//! Adventure content: scenes, choices and the scene graph

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SiteRpgError};
use crate::skill::SkillCheck;

/// One button in a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub text: String,
    #[serde(default)]
    pub next_scene: Option<String>,
    #[serde(default)]
    pub skill_check: Option<SkillCheck>,
    #[serde(default)]
    pub require_flag: Option<String>,
    #[serde(default)]
    pub forbid_flag: Option<String>,
    #[serde(default)]
    pub require_item: Option<String>,
}

impl Choice {
    /// Visible given the current flags and inventory
    pub fn is_available(&self, flags: &AHashMap<String, bool>, inventory: &[String]) -> bool {
        let flag = |name: &String| flags.get(name).copied().unwrap_or(false);

        if let Some(required) = &self.require_flag {
            if !flag(required) {
                return false;
            }
        }
        if let Some(forbidden) = &self.forbid_flag {
            if flag(forbidden) {
                return false;
            }
        }
        if let Some(item) = &self.require_item {
            if !inventory.iter().any(|held| held == item) {
                return false;
            }
        }
        true
    }

    /// Every scene id this choice can lead to
    pub fn targets(&self) -> Vec<&str> {
        let mut targets = Vec::new();
        if let Some(next) = &self.next_scene {
            targets.push(next.as_str());
        }
        if let Some(check) = &self.skill_check {
            targets.push(check.success.as_str());
            targets.push(check.failure.as_str());
            if let Some(crit) = &check.crit_success {
                targets.push(crit.as_str());
            }
            if let Some(crit) = &check.crit_fail {
                targets.push(crit.as_str());
            }
        }
        targets
    }
}

/// A node in the scene graph
///
/// Entering a scene applies, in order: XP, damage, healing, item, flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub xp_reward: i32,
    #[serde(default)]
    pub damage: i32,
    #[serde(default)]
    pub damage_message: Option<String>,
    #[serde(default)]
    pub healing: i32,
    #[serde(default)]
    pub give_item: Option<String>,
    #[serde(default)]
    pub set_flags: AHashMap<String, bool>,
    #[serde(default)]
    pub is_death: bool,
    #[serde(default)]
    pub is_victory: bool,
}

impl Scene {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.is_death || self.is_victory
    }
}

/// A complete adventure: metadata plus the scene graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adventure {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub starting_scene: String,
    pub scenes: AHashMap<String, Scene>,
}

/// A defect in an adventure's scene graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphIssue {
    /// A reference to a scene that does not exist; `from` is `None` for the
    /// starting scene
    MissingScene { from: Option<String>, target: String },
    /// A scene stored under a key other than its own `id`
    MismatchedId { key: String, id: String },
}

impl fmt::Display for GraphIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphIssue::MissingScene { from: Some(from), target } => {
                write!(f, "scene '{}' references missing scene '{}'", from, target)
            }
            GraphIssue::MissingScene { from: None, target } => {
                write!(f, "starting scene '{}' is missing", target)
            }
            GraphIssue::MismatchedId { key, id } => {
                write!(f, "scene stored under '{}' declares id '{}'", key, id)
            }
        }
    }
}

impl Adventure {
    pub fn scene(&self, id: &str) -> Result<&Scene> {
        self.scenes
            .get(id)
            .ok_or_else(|| SiteRpgError::SceneNotFound(id.to_string()))
    }

    /// Every missing reference and key/id mismatch, sorted for stable output
    pub fn validate(&self) -> Vec<GraphIssue> {
        let mut issues = Vec::new();
        if !self.scenes.contains_key(&self.starting_scene) {
            issues.push(GraphIssue::MissingScene {
                from: None,
                target: self.starting_scene.clone(),
            });
        }
        let mut keys: Vec<&String> = self.scenes.keys().collect();
        keys.sort();
        for key in keys {
            let scene = &self.scenes[key];
            if &scene.id != key {
                issues.push(GraphIssue::MismatchedId {
                    key: key.clone(),
                    id: scene.id.clone(),
                });
            }
            for choice in &scene.choices {
                for target in choice.targets() {
                    if !self.scenes.contains_key(target) {
                        issues.push(GraphIssue::MissingScene {
                            from: Some(key.clone()),
                            target: target.to_string(),
                        });
                    }
                }
            }
        }
        issues
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Parse a JSON list of adventures into a map keyed by id
pub fn adventures_from_json(json: &str) -> Result<AHashMap<String, Adventure>> {
    let list: Vec<Adventure> = serde_json::from_str(json)?;
    Ok(list.into_iter().map(|a| (a.id.clone(), a)).collect())
}

const BUILTIN_ADVENTURES: [&str; 2] = [
    include_str!("../../content/adventures/dungeon_delve.json"),
    include_str!("../../content/adventures/cold_storage.json"),
];

/// Adventures shipped with the crate, keyed by id
pub fn builtin_adventures() -> Result<AHashMap<String, Adventure>> {
    let mut map = AHashMap::new();
    for json in BUILTIN_ADVENTURES {
        let adventure = Adventure::from_json(json)?;
        map.insert(adventure.id.clone(), adventure);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(id: &str, choices: Vec<Choice>) -> Scene {
        Scene {
            id: id.to_string(),
            title: id.to_string(),
            icon: None,
            text: String::new(),
            choices,
            xp_reward: 0,
            damage: 0,
            damage_message: None,
            healing: 0,
            give_item: None,
            set_flags: AHashMap::new(),
            is_death: false,
            is_victory: false,
        }
    }

    fn go(text: &str, next: &str) -> Choice {
        Choice {
            text: text.to_string(),
            next_scene: Some(next.to_string()),
            skill_check: None,
            require_flag: None,
            forbid_flag: None,
            require_item: None,
        }
    }

    #[test]
    fn test_choice_filters() {
        let mut flags = AHashMap::new();
        let inventory = vec!["keycard".to_string()];

        let mut gated = go("Open", "vault");
        gated.require_flag = Some("power_on".to_string());
        assert!(!gated.is_available(&flags, &inventory));
        flags.insert("power_on".to_string(), true);
        assert!(gated.is_available(&flags, &inventory));

        let mut forbidden = go("Sneak", "vault");
        forbidden.forbid_flag = Some("alarm".to_string());
        assert!(forbidden.is_available(&flags, &inventory));
        flags.insert("alarm".to_string(), false);
        assert!(forbidden.is_available(&flags, &inventory));
        flags.insert("alarm".to_string(), true);
        assert!(!forbidden.is_available(&flags, &inventory));

        let mut item = go("Swipe", "vault");
        item.require_item = Some("keycard".to_string());
        assert!(item.is_available(&flags, &inventory));
        assert!(!item.is_available(&flags, &[]));
    }

    #[test]
    fn test_validate_reports_dangling() {
        let mut scenes = AHashMap::new();
        scenes.insert("a".to_string(), scene("a", vec![go("on", "b"), go("lost", "nowhere")]));
        scenes.insert("b".to_string(), scene("b", vec![]));
        let adventure = Adventure {
            id: "t".to_string(),
            title: "T".to_string(),
            description: String::new(),
            icon: None,
            starting_scene: "missing_start".to_string(),
            scenes,
        };

        let issues = adventure.validate();
        assert_eq!(
            issues,
            vec![
                GraphIssue::MissingScene {
                    from: None,
                    target: "missing_start".to_string()
                },
                GraphIssue::MissingScene {
                    from: Some("a".to_string()),
                    target: "nowhere".to_string()
                },
            ]
        );
        assert!(matches!(adventure.scene("zzz"), Err(SiteRpgError::SceneNotFound(_))));
    }

    #[test]
    fn test_validate_reports_mismatched_id() {
        let mut scenes = AHashMap::new();
        scenes.insert("start".to_string(), scene("entrance", vec![go("on", "end")]));
        scenes.insert("end".to_string(), scene("end", vec![]));
        let adventure = Adventure {
            id: "t".to_string(),
            title: "T".to_string(),
            description: String::new(),
            icon: None,
            starting_scene: "start".to_string(),
            scenes,
        };

        let issues = adventure.validate();
        assert_eq!(
            issues,
            vec![GraphIssue::MismatchedId {
                key: "start".to_string(),
                id: "entrance".to_string()
            }]
        );
        assert_eq!(issues[0].to_string(), "scene stored under 'start' declares id 'entrance'");
    }

    #[test]
    fn test_builtin_adventures_are_complete() {
        let adventures = builtin_adventures().unwrap();
        assert_eq!(adventures.len(), 2);
        for adventure in adventures.values() {
            assert!(adventure.validate().is_empty(), "{}", adventure.id);
            assert!(adventure.scenes.values().any(|s| s.is_victory));
            assert!(adventure.scenes.values().any(|s| s.is_death));
        }
    }

    #[test]
    fn test_dungeon_delve_content() {
        let adventures = builtin_adventures().unwrap();
        let delve = adventures.get("dungeon_delve").unwrap();
        assert_eq!(delve.title, "The Forgotten Server Room");
        assert_eq!(delve.starting_scene, "entrance");
        assert_eq!(delve.scenes.len(), 69);

        let entrance = delve.scene("entrance").unwrap();
        assert_eq!(entrance.xp_reward, 5);
        let force = entrance.choices[0].skill_check.as_ref().unwrap();
        assert_eq!((force.stat.as_str(), force.dc), ("strength", 12));
        assert_eq!(force.success, "forced_entry");

        let hacked = delve.scene("panel_hacked").unwrap();
        assert_eq!(hacked.set_flags.get("has_map"), Some(&true));
        assert_eq!(delve.scene("victory_perfect").unwrap().xp_reward, 75);
    }

    #[test]
    fn test_parse_camel_case_fields() {
        let json = r#"{
            "id": "mini",
            "title": "Mini",
            "startingScene": "start",
            "scenes": {
                "start": {
                    "id": "start",
                    "xpReward": 5,
                    "giveItem": "torch",
                    "setFlags": {"lit": true},
                    "choices": [
                        {"text": "Climb", "skillCheck": {"stat": "agility", "dc": 12, "success": "end", "failure": "start", "critFail": "end"}},
                        {"text": "Look", "nextScene": "end", "requireItem": "torch"}
                    ]
                },
                "end": {"id": "end", "isVictory": true}
            }
        }"#;
        let adventure = Adventure::from_json(json).unwrap();
        let start = adventure.scene("start").unwrap();
        assert_eq!(start.xp_reward, 5);
        assert_eq!(start.give_item.as_deref(), Some("torch"));
        assert_eq!(start.set_flags.get("lit"), Some(&true));
        assert_eq!(start.choices[0].skill_check.as_ref().unwrap().crit_fail.as_deref(), Some("end"));
        assert!(adventure.scene("end").unwrap().is_victory);
        assert!(adventure.validate().is_empty());
    }
}
