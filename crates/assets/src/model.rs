//! CPU-side mesh extraction from an imported glTF document.
//!
//! Every triangle primitive reachable from the default scene is baked into
//! one indexed mesh in model space, with node transforms applied.

use glam::{Mat3, Mat4, Vec3};

/// Flattened triangle mesh ready for upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.positions.iter().copied().map(Vec3::from);
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

/// Bake the document's default scene (or its first scene) into one mesh.
/// Documents without scenes contribute every mesh untransformed.
pub(crate) fn flatten(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> MeshData {
    let mut out = MeshData::default();
    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                visit(&node, Mat4::IDENTITY, buffers, &mut out);
            }
        }
        None => {
            for mesh in document.meshes() {
                append_mesh(&mesh, Mat4::IDENTITY, buffers, &mut out);
            }
        }
    }
    out
}

fn visit(node: &gltf::Node, parent: Mat4, buffers: &[gltf::buffer::Data], out: &mut MeshData) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        append_mesh(&mesh, world, buffers, out);
    }
    for child in node.children() {
        visit(&child, world, buffers, out);
    }
}

fn append_mesh(mesh: &gltf::Mesh, world: Mat4, buffers: &[gltf::buffer::Data], out: &mut MeshData) {
    let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
    for prim in mesh.primitives() {
        if prim.mode() != gltf::mesh::Mode::Triangles {
            tracing::warn!(mesh = mesh.name(), mode = ?prim.mode(), "skipping non-triangle primitive");
            continue;
        }
        let reader = prim.reader(|buf| buffers.get(buf.index()).map(|b| b.0.as_slice()));
        let Some(positions) = reader.read_positions() else {
            continue;
        };

        let start = out.positions.len() as u32;
        out.positions
            .extend(positions.map(|p| world.transform_point3(Vec3::from(p)).to_array()));
        let added = out.positions.len() - start as usize;

        let mut normals: Vec<[f32; 3]> = reader
            .read_normals()
            .map(|it| {
                it.map(|n| (normal_matrix * Vec3::from(n)).normalize_or(Vec3::Y).to_array())
                    .collect()
            })
            .unwrap_or_default();
        normals.resize(added, [0.0, 1.0, 0.0]);
        out.normals.extend(normals);

        match reader.read_indices() {
            Some(indices) => out.indices.extend(indices.into_u32().map(|i| i + start)),
            None => out.indices.extend(start..start + added as u32),
        }
    }
}
