//! Model loading with a per-loader cache.
//!
//! Models are addressed by a name relative to the loader's root directory
//! and cached by that name, so a second request for the same model returns
//! the shared geometry without touching the filesystem.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use futures::future::try_join_all;

use crate::error::LoadError;
use crate::gfx::geometry::Geometry;

/// Directory showcases load their assets from: `VITRINE_ASSETS` when set,
/// otherwise the `assets` directory shipped with the crate.
pub fn asset_root() -> PathBuf {
    const BUNDLED: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");
    std::env::var_os("VITRINE_ASSETS")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(BUNDLED))
}

/// Loads Wavefront OBJ models from a directory.
#[derive(Debug)]
pub struct AssetLoader {
    root: PathBuf,
    cache: RefCell<HashMap<String, Rc<Geometry>>>,
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new(asset_root())
    }
}

impl AssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.borrow().contains_key(name)
    }

    pub fn cached_count(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Load an OBJ model; every object in the file is merged into one
    /// geometry. Materials referenced by the file are resolved next to it but
    /// only their presence is logged.
    pub async fn load_model(&self, name: &str) -> Result<Rc<Geometry>, LoadError> {
        if let Some(model) = self.lookup(name) {
            return Ok(model);
        }

        let path = self.resolve(name);
        let file = fs::File::open(&path).map_err(|source| LoadError::Io {
            name: name.to_string(),
            path: path.clone(),
            source,
        })?;

        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let (models, materials) = tobj::load_obj_buf(
            &mut BufReader::new(file),
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
            |mtl| tobj::load_mtl(base.join(mtl)),
        )
        .map_err(|source| LoadError::Model {
            name: name.to_string(),
            path: path.clone(),
            source,
        })?;

        match materials {
            Ok(materials) => log::debug!("model '{}': {} materials", name, materials.len()),
            Err(err) => log::debug!("model '{}': no materials ({})", name, err),
        }

        let mut geometry = Geometry::default();
        for model in &models {
            geometry.append(&Geometry::from_obj_mesh(&model.mesh));
        }
        log::debug!(
            "model '{}': {} objects, {} triangles",
            name,
            models.len(),
            geometry.triangle_count()
        );

        let geometry = Rc::new(geometry);
        self.cache
            .borrow_mut()
            .insert(name.to_string(), Rc::clone(&geometry));
        Ok(geometry)
    }

    /// Load several models concurrently, in order; fails on the first error.
    pub async fn load_many_models(&self, names: &[&str]) -> Result<Vec<Rc<Geometry>>, LoadError> {
        try_join_all(names.iter().map(|name| self.load_model(name))).await
    }

    fn lookup(&self, name: &str) -> Option<Rc<Geometry>> {
        let hit = self.cache.borrow().get(name).cloned();
        match &hit {
            Some(_) => log::debug!("model cache hit: {}", name),
            None => log::debug!("model cache miss: {}", name),
        }
        hit
    }
}
