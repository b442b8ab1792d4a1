use anyhow::{bail, Result};
use backdrop::{Overlay, OverlayTypes, TypeKind};

/// Overlay types known to the command-line host.
pub fn builtin_types() -> Result<OverlayTypes> {
    let mut types = OverlayTypes::new();
    types.register_root("Screen", TypeKind::Overlay)?;
    types.register_root("Widget", TypeKind::Other)?;
    types.register("MenuScreen", "Screen")?;
    types.register("ContainerScreen", "Screen")?;
    types.register("ChatOverlay", "Screen")?;
    types.register("PauseMenu", "MenuScreen")?;
    types.register("OptionsMenu", "MenuScreen")?;
    types.register("InventoryScreen", "ContainerScreen")?;
    types.register("Button", "Widget")?;
    Ok(types)
}

/// Simulated overlay instance of a registered type.
#[derive(Clone, Debug)]
pub struct HostOverlay {
    tag: String,
    blur: Option<bool>,
}

impl HostOverlay {
    pub fn open(types: &OverlayTypes, tag: &str) -> Result<Self> {
        if let Err(err) = types.resolve(tag) {
            bail!("cannot open overlay: {err}");
        }
        let blur = match tag {
            "OptionsMenu" => Some(false),
            _ => None,
        };
        Ok(Self {
            tag: tag.to_string(),
            blur,
        })
    }
}

impl Overlay for HostOverlay {
    fn type_tag(&self) -> &str {
        &self.tag
    }

    fn should_blur_background(&self) -> Option<bool> {
        self.blur
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_expected_hierarchy() {
        let types = builtin_types().unwrap();
        assert!(types.is_subtype("PauseMenu", "Screen"));
        assert!(types.is_subtype("InventoryScreen", "ContainerScreen"));
        assert!(!types.is_subtype("ChatOverlay", "MenuScreen"));
        assert!(types.resolve("Button").is_err());
    }

    #[test]
    fn options_menu_declines_blur() {
        let types = builtin_types().unwrap();
        let options = HostOverlay::open(&types, "OptionsMenu").unwrap();
        assert_eq!(options.should_blur_background(), Some(false));
        let pause = HostOverlay::open(&types, "PauseMenu").unwrap();
        assert_eq!(pause.should_blur_background(), None);
    }

    #[test]
    fn unknown_or_non_overlay_tags_are_rejected() {
        let types = builtin_types().unwrap();
        assert!(HostOverlay::open(&types, "Nope").is_err());
        assert!(HostOverlay::open(&types, "Widget").is_err());
    }
}
