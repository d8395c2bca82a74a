//! Startup asset loading: the ground texture and the player model.
//!
//! Assets live at fixed paths relative to an asset root. The texture is
//! decoded with `image` and the model imported with `gltf`. Loading either
//! succeeds with everything the game needs or fails with an [`AssetError`];
//! there is no partial result.

pub mod model;

pub use model::MeshData;
use std::path::{Path, PathBuf};

/// Ground texture location relative to the asset root.
pub const GROUND_TEXTURE_PATH: &str = "assets/grass.jpg";
/// Player model location relative to the asset root.
pub const PLAYER_MODEL_PATH: &str = "assets/untitled.glb";
/// How many times the ground texture tiles across the plane, per axis.
pub const GROUND_TEXTURE_REPEAT: [f32; 2] = [40.0, 40.0];

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: cannot decode image: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{}: invalid glTF: {source}", path.display())]
    Model {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },
    #[error("{}: model has no triangles", .0.display())]
    EmptyModel(PathBuf),
}

/// Decoded ground texture, tightly packed RGBA8 rows.
#[derive(Clone)]
pub struct TextureAsset {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub repeat: [f32; 2],
}

impl std::fmt::Debug for TextureAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureAsset")
            .field("path", &self.path)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("repeat", &self.repeat)
            .finish_non_exhaustive()
    }
}

/// Imported player model.
#[derive(Debug, Clone)]
pub struct ModelAsset {
    pub path: PathBuf,
    pub mesh_names: Vec<String>,
    pub node_count: usize,
    /// Base colour factor of the first material, white without one.
    pub base_color: [f32; 4],
    pub mesh: MeshData,
}

/// Everything the game loads before the player can spawn.
#[derive(Debug, Clone)]
pub struct StartupAssets {
    pub ground: TextureAsset,
    pub player: ModelAsset,
}

/// Where the startup assets live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetManifest {
    pub ground_texture: PathBuf,
    pub player_model: PathBuf,
}

impl AssetManifest {
    /// Default file layout under `root`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            ground_texture: root.join(GROUND_TEXTURE_PATH),
            player_model: root.join(PLAYER_MODEL_PATH),
        }
    }

    /// Load and decode both assets. The texture is checked first.
    pub fn load(&self) -> Result<StartupAssets, AssetError> {
        let ground = load_texture(&self.ground_texture)?;
        let player = load_model(&self.player_model)?;
        tracing::info!(
            texture = %ground.path.display(),
            model = %player.path.display(),
            triangles = player.mesh.triangle_count(),
            "startup assets loaded"
        );
        Ok(StartupAssets { ground, player })
    }
}

/// Shorthand for `AssetManifest::under(root).load()`.
pub fn load_startup_assets(root: impl AsRef<Path>) -> Result<StartupAssets, AssetError> {
    AssetManifest::under(root).load()
}

fn read(path: &Path) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            AssetError::NotFound(path.to_path_buf())
        } else {
            AssetError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Read and decode a JPEG or PNG texture to RGBA8.
pub fn load_texture(path: impl AsRef<Path>) -> Result<TextureAsset, AssetError> {
    let path = path.as_ref();
    let bytes = read(path)?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|source| AssetError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = decoded.dimensions();
    tracing::debug!(path = %path.display(), width, height, "texture decoded");
    Ok(TextureAsset {
        path: path.to_path_buf(),
        width,
        height,
        rgba: decoded.into_raw(),
        repeat: GROUND_TEXTURE_REPEAT,
    })
}

/// Import a binary glTF model and bake its scene into one mesh.
pub fn load_model(path: impl AsRef<Path>) -> Result<ModelAsset, AssetError> {
    let path = path.as_ref();
    let bytes = read(path)?;
    let (document, buffers, _images) =
        gltf::import_slice(&bytes).map_err(|source| AssetError::Model {
            path: path.to_path_buf(),
            source,
        })?;

    let mesh = model::flatten(&document, &buffers);
    if mesh.is_empty() {
        return Err(AssetError::EmptyModel(path.to_path_buf()));
    }
    let mesh_names = document
        .meshes()
        .map(|m| m.name().unwrap_or_default().to_string())
        .collect::<Vec<_>>();
    let base_color = document
        .materials()
        .next()
        .map(|m| m.pbr_metallic_roughness().base_color_factor())
        .unwrap_or([1.0; 4]);

    tracing::debug!(
        path = %path.display(),
        meshes = ?mesh_names,
        vertices = mesh.positions.len(),
        "model imported"
    );
    Ok(ModelAsset {
        path: path.to_path_buf(),
        mesh_names,
        node_count: document.nodes().len(),
        base_color,
        mesh,
    })
}

pub fn crate_info() -> &'static str {
    "pursuit-assets v0.1.0"
}
