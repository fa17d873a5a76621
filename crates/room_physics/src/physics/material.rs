//! Surface materials
//!
//! A material is the physical-property tag (friction, bounciness) carried by
//! tile types and room boundaries and reported back in collision results.
//! Results and hitboxes only hold a [`MaterialId`]; the definitions live in a
//! [`MaterialLibrary`]. There is no "absent" material: [`MaterialId::NONE`]
//! is always valid and resolves to the built-in `none` definition.

use serde::{Deserialize, Serialize};

/// Handle to a material registered in a [`MaterialLibrary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct MaterialId(u16);

impl MaterialId {
    /// The "no material" sentinel
    pub const NONE: MaterialId = MaterialId(0);

    /// Raw index into the owning library
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Whether this is the sentinel
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

/// Physical properties of a surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Unique name used by configuration files
    pub name: String,
    /// Friction coefficient (0 = ice)
    #[serde(default = "default_friction")]
    pub friction: f32,
    /// Restitution (0 = no bounce, 1 = perfectly elastic)
    #[serde(default)]
    pub bounciness: f32,
}

fn default_friction() -> f32 {
    1.0
}

impl Material {
    /// Name of the built-in sentinel material
    pub const NONE_NAME: &'static str = "none";

    /// Create a material with the given coefficients
    pub fn new(name: impl Into<String>, friction: f32, bounciness: f32) -> Self {
        Self {
            name: name.into(),
            friction,
            bounciness,
        }
    }

    fn none() -> Self {
        Self::new(Self::NONE_NAME, default_friction(), 0.0)
    }
}

/// Owns every material definition and hands out [`MaterialId`]s
#[derive(Debug, Clone)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialLibrary {
    /// Create a library containing only the sentinel
    pub fn new() -> Self {
        Self {
            materials: vec![Material::none()],
        }
    }

    /// Build a library from definitions (e.g. parsed from a config file).
    /// A definition named like an existing one replaces it.
    pub fn from_materials(materials: impl IntoIterator<Item = Material>) -> Self {
        let mut library = Self::new();
        for material in materials {
            library.register(material);
        }
        library
    }

    /// Register a material, returning its handle.
    ///
    /// Registering a name twice overwrites the earlier definition and keeps
    /// its handle; the sentinel cannot be redefined.
    pub fn register(&mut self, material: Material) -> MaterialId {
        if material.name == Material::NONE_NAME {
            log::warn!("Ignoring redefinition of the '{}' material", Material::NONE_NAME);
            return MaterialId::NONE;
        }
        if let Some(existing) = self.by_name(&material.name) {
            self.materials[existing.index()] = material;
            return existing;
        }
        let id = match u16::try_from(self.materials.len()) {
            Ok(raw) => MaterialId(raw),
            Err(_) => {
                log::warn!("Material library full, '{}' maps to none", material.name);
                return MaterialId::NONE;
            }
        };
        log::debug!("Registered material '{}' as {:?}", material.name, id);
        self.materials.push(material);
        id
    }

    /// Look up a handle by material name
    pub fn by_name(&self, name: &str) -> Option<MaterialId> {
        self.materials
            .iter()
            .position(|m| m.name == name)
            .and_then(|index| u16::try_from(index).ok())
            .map(MaterialId)
    }

    /// Resolve a handle. Unknown handles resolve to the sentinel definition.
    pub fn get(&self, id: MaterialId) -> &Material {
        self.materials.get(id.index()).unwrap_or(&self.materials[0])
    }

    /// Number of registered materials, sentinel included
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Always false: the sentinel is always present
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over `(handle, definition)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .filter_map(|(index, m)| u16::try_from(index).ok().map(|raw| (MaterialId(raw), m)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_always_present() {
        let library = MaterialLibrary::new();
        assert_eq!(library.len(), 1);
        assert_eq!(library.get(MaterialId::NONE).name, "none");
        assert_eq!(library.by_name("none"), Some(MaterialId::NONE));
    }

    #[test]
    fn test_register_and_lookup() {
        let mut library = MaterialLibrary::new();
        let stone = library.register(Material::new("stone", 0.8, 0.1));
        let ice = library.register(Material::new("ice", 0.05, 0.0));

        assert_ne!(stone, ice);
        assert!(!stone.is_none());
        assert_eq!(library.by_name("ice"), Some(ice));
        assert_eq!(library.get(stone).friction, 0.8);
    }

    #[test]
    fn test_redefinition_keeps_handle() {
        let mut library = MaterialLibrary::new();
        let first = library.register(Material::new("mud", 2.0, 0.0));
        let second = library.register(Material::new("mud", 3.0, 0.0));

        assert_eq!(first, second);
        assert_eq!(library.get(first).friction, 3.0);
        assert_eq!(library.register(Material::new("none", 9.0, 9.0)), MaterialId::NONE);
        assert_eq!(library.get(MaterialId::NONE).friction, 1.0);
    }

    #[test]
    fn test_unknown_handle_resolves_to_none() {
        let library = MaterialLibrary::new();
        assert_eq!(library.get(MaterialId(42)).name, "none");
    }
}
