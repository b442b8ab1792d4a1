//! Overlay identity and the blur blacklist.
//!
//! Overlays identify themselves with a stable type tag. Tags are registered in
//! [`OverlayTypes`] as a forest so the blacklist can match a tag together with
//! every tag derived from it, without any runtime type introspection.

use std::collections::{HashMap, HashSet};

/// A foreground surface drawn above the live scene.
pub trait Overlay {
    /// Stable type tag, matched against the blacklist.
    fn type_tag(&self) -> &str;

    /// Explicit opinion on background blur. `None` defers to the blacklist.
    fn should_blur_background(&self) -> Option<bool> {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Overlay,
    Other,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("type '{0}' is not registered")]
    NotFound(String),
    #[error("type '{0}' is not an overlay type")]
    NotAnOverlay(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("type '{0}' is already registered")]
    Duplicate(String),
    #[error("parent type '{parent}' of '{name}' is not registered")]
    UnknownParent { name: String, parent: String },
}

#[derive(Clone, Debug)]
struct TypeEntry {
    parent: Option<String>,
    kind: TypeKind,
}

/// Resolved reference to a registered overlay type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeRef {
    name: String,
}

impl TypeRef {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Registry of known type tags and their parent links.
#[derive(Clone, Debug, Default)]
pub struct OverlayTypes {
    entries: HashMap<String, TypeEntry>,
}

impl OverlayTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_root(&mut self, name: &str, kind: TypeKind) -> Result<(), RegistryError> {
        if self.entries.contains_key(name) {
            return Err(RegistryError::Duplicate(name.to_string()));
        }
        self.entries
            .insert(name.to_string(), TypeEntry { parent: None, kind });
        Ok(())
    }

    /// Registers `name` below `parent`; the kind is inherited.
    pub fn register(&mut self, name: &str, parent: &str) -> Result<(), RegistryError> {
        if self.entries.contains_key(name) {
            return Err(RegistryError::Duplicate(name.to_string()));
        }
        let kind = self
            .entries
            .get(parent)
            .map(|entry| entry.kind)
            .ok_or_else(|| RegistryError::UnknownParent {
                name: name.to_string(),
                parent: parent.to_string(),
            })?;
        self.entries.insert(
            name.to_string(),
            TypeEntry {
                parent: Some(parent.to_string()),
                kind,
            },
        );
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<TypeRef, ResolveError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| ResolveError::NotFound(name.to_string()))?;
        match entry.kind {
            TypeKind::Overlay => Ok(TypeRef {
                name: name.to_string(),
            }),
            TypeKind::Other => Err(ResolveError::NotAnOverlay(name.to_string())),
        }
    }

    /// True when `tag` is `ancestor` or registered somewhere below it.
    pub fn is_subtype(&self, tag: &str, ancestor: &str) -> bool {
        let mut current = Some(tag);
        while let Some(name) = current {
            if name == ancestor {
                return true;
            }
            current = self
                .entries
                .get(name)
                .and_then(|entry| entry.parent.as_deref());
        }
        false
    }

    fn covered_by(&self, ancestor: &str) -> HashSet<String> {
        let mut covered: HashSet<String> = self
            .entries
            .keys()
            .filter(|name| self.is_subtype(name, ancestor))
            .cloned()
            .collect();
        covered.insert(ancestor.to_string());
        covered
    }
}

#[derive(Clone, Debug)]
struct BlacklistEntry {
    name: String,
    covers: HashSet<String>,
}

/// Ordered set of overlay types that never receive background blur.
#[derive(Clone, Debug, Default)]
pub struct Blacklist {
    entries: Vec<BlacklistEntry>,
}

impl Blacklist {
    /// Resolves `names` in order. Blank names are ignored; names that fail to
    /// resolve are logged and skipped without aborting the rest of the list.
    pub fn load<I, S>(names: I, types: &OverlayTypes) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        for raw in names {
            let name = raw.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            match types.resolve(name) {
                Ok(type_ref) => entries.push(BlacklistEntry {
                    covers: types.covered_by(type_ref.name()),
                    name: type_ref.name,
                }),
                Err(error @ ResolveError::NotFound(_)) => {
                    tracing::warn!(
                        entry = name,
                        %error,
                        "failed to add blur blacklist entry: make sure the type tag exists"
                    );
                }
                Err(error @ ResolveError::NotAnOverlay(_)) => {
                    tracing::warn!(
                        entry = name,
                        %error,
                        "failed to add blur blacklist entry: make sure the type is an overlay"
                    );
                }
            }
        }
        entries.shrink_to_fit();
        Self { entries }
    }

    /// First entry, in blacklist order, covering `tag`.
    pub fn matches(&self, tag: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.covers.contains(tag))
            .map(|entry| entry.name.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_types() -> OverlayTypes {
        let mut types = OverlayTypes::new();
        types.register_root("Screen", TypeKind::Overlay).unwrap();
        types.register_root("Widget", TypeKind::Other).unwrap();
        types.register("MenuScreen", "Screen").unwrap();
        types.register("PauseMenu", "MenuScreen").unwrap();
        types.register("ChatOverlay", "Screen").unwrap();
        types.register("Button", "Widget").unwrap();
        types
    }

    #[test]
    fn registry_rejects_duplicates_and_orphans() {
        let mut types = sample_types();
        assert_eq!(
            types.register("PauseMenu", "Screen"),
            Err(RegistryError::Duplicate("PauseMenu".into()))
        );
        assert!(matches!(
            types.register("Lost", "Missing"),
            Err(RegistryError::UnknownParent { .. })
        ));
    }

    #[test]
    fn resolve_distinguishes_missing_and_non_overlay() {
        let types = sample_types();
        assert_eq!(types.resolve("PauseMenu").unwrap().name(), "PauseMenu");
        assert_eq!(
            types.resolve("Nope"),
            Err(ResolveError::NotFound("Nope".into()))
        );
        assert_eq!(
            types.resolve("Button"),
            Err(ResolveError::NotAnOverlay("Button".into()))
        );
    }

    #[test]
    fn subtype_check_is_reflexive_and_transitive() {
        let types = sample_types();
        assert!(types.is_subtype("PauseMenu", "PauseMenu"));
        assert!(types.is_subtype("PauseMenu", "MenuScreen"));
        assert!(types.is_subtype("PauseMenu", "Screen"));
        assert!(!types.is_subtype("MenuScreen", "PauseMenu"));
        assert!(!types.is_subtype("ChatOverlay", "MenuScreen"));
    }

    #[test]
    fn blacklist_skips_bad_entries_and_keeps_the_rest() {
        let types = sample_types();
        let blacklist = Blacklist::load(
            ["", "Missing", "Button", "MenuScreen", "ChatOverlay"],
            &types,
        );
        assert_eq!(blacklist.len(), 2);
        assert_eq!(
            blacklist.names().collect::<Vec<_>>(),
            vec!["MenuScreen", "ChatOverlay"]
        );
    }

    #[test]
    fn blacklist_matches_subtypes_in_order() {
        let types = sample_types();
        let blacklist = Blacklist::load(["Screen", "PauseMenu"], &types);
        assert_eq!(blacklist.matches("PauseMenu"), Some("Screen"));
        assert_eq!(blacklist.matches("ChatOverlay"), Some("Screen"));
        assert_eq!(blacklist.matches("Unregistered"), None);

        let narrow = Blacklist::load(["MenuScreen"], &types);
        assert_eq!(narrow.matches("PauseMenu"), Some("MenuScreen"));
        assert_eq!(narrow.matches("ChatOverlay"), None);
    }
}
