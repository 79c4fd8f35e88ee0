//! GLB model summary
//!
//! Only what the scene wires up is kept: mesh-bearing nodes with their
//! bounds (for colliders) and animation clip names (for the mixer).
//! Vertex data and skinning stay with the renderer.

use std::path::Path;

use welcome_math::Vec3;
use welcome_physics::Aabb;

use crate::asset_cache::Asset;
use crate::asset_error::AssetError;

/// A mesh-bearing node
#[derive(Clone, Debug, PartialEq)]
pub struct MeshInfo {
    /// Node name, falling back to the mesh name
    pub name: Option<String>,
    /// Union of the primitive bounds in model space (node transforms applied)
    pub bounds: Option<Aabb>,
}

impl MeshInfo {
    /// Case-insensitive substring match on the name
    pub fn name_contains(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.name
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(&needle))
    }
}

/// A named animation clip
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub channel_count: usize,
}

/// Decoded model
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelAsset {
    pub scene_count: usize,
    pub meshes: Vec<MeshInfo>,
    /// Clips in file order; unnamed clips are kept with an empty name
    pub animations: Vec<AnimationClip>,
}

impl ModelAsset {
    /// Decode a binary glTF (or glTF JSON) document
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AssetError> {
        let gltf = gltf::Gltf::from_slice(bytes)?;

        let mut meshes = Vec::new();
        for root in root_nodes(&gltf) {
            collect_meshes(&root, IDENTITY, &mut meshes);
        }

        let animations = gltf
            .animations()
            .map(|anim| AnimationClip {
                name: anim.name().unwrap_or_default().to_string(),
                channel_count: anim.channels().count(),
            })
            .collect();

        Ok(Self {
            scene_count: gltf.scenes().count(),
            meshes,
            animations,
        })
    }

    /// Clips that carry a non-empty name
    pub fn named_animations(&self) -> impl Iterator<Item = &AnimationClip> {
        self.animations.iter().filter(|a| !a.name.is_empty())
    }

}

/// Column-major 4x4 matrix, as glTF stores it
type Mat4 = [[f32; 4]; 4];

const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

fn mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [[0.0; 4]; 4];
    for (col, out_col) in out.iter_mut().enumerate() {
        for (row, value) in out_col.iter_mut().enumerate() {
            *value = (0..4).map(|k| a[k][row] * b[col][k]).sum();
        }
    }
    out
}

/// Box around `aabb` after an affine transform
fn transform_aabb(m: &Mat4, aabb: &Aabb) -> Aabb {
    let (lo, hi) = (aabb.min.to_array(), aabb.max.to_array());
    let mut min = [m[3][0], m[3][1], m[3][2]];
    let mut max = min;
    for row in 0..3 {
        for col in 0..3 {
            let a = m[col][row] * lo[col];
            let b = m[col][row] * hi[col];
            min[row] += a.min(b);
            max[row] += a.max(b);
        }
    }
    Aabb::new(Vec3::from_array(min), Vec3::from_array(max))
}

/// Nodes of the default scene, or every parentless node if there is no scene
fn root_nodes(gltf: &gltf::Gltf) -> Vec<gltf::Node<'_>> {
    if let Some(scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) {
        return scene.nodes().collect();
    }
    let children: std::collections::HashSet<usize> = gltf
        .nodes()
        .flat_map(|n| n.children().map(|c| c.index()))
        .collect();
    gltf.nodes().filter(|n| !children.contains(&n.index())).collect()
}

fn collect_meshes(node: &gltf::Node<'_>, parent: Mat4, out: &mut Vec<MeshInfo>) {
    let world = mul(&parent, &node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let bounds = mesh
            .primitives()
            .map(|p| {
                let bb = p.bounding_box();
                Aabb::new(Vec3::from_array(bb.min), Vec3::from_array(bb.max))
            })
            .reduce(|a, b| a.union(&b))
            .map(|local| transform_aabb(&world, &local));
        let name = node.name().or(mesh.name()).map(str::to_string);
        out.push(MeshInfo { name, bounds });
    }

    for child in node.children() {
        collect_meshes(&child, world, out);
    }
}

impl Asset for ModelAsset {
    fn load_from_file(path: &Path) -> Result<Self, AssetError> {
        let bytes = std::fs::read(path)?;
        Self::from_slice(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal glTF JSON with one mesh node and two animations
    const MINIMAL_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scenes": [ { "nodes": [0] } ],
        "nodes": [ { "name": "BookMesh", "mesh": 0 } ],
        "buffers": [ { "byteLength": 36 } ],
        "bufferViews": [ { "buffer": 0, "byteLength": 36 } ],
        "accessors": [ {
            "bufferView": 0,
            "componentType": 5126,
            "count": 3,
            "type": "VEC3",
            "min": [-1.0, 0.0, -2.0],
            "max": [1.0, 0.5, 2.0]
        } ],
        "meshes": [ { "name": "pages", "primitives": [ { "attributes": { "POSITION": 0 } } ] } ],
        "animations": [
            { "name": "idle", "channels": [], "samplers": [] },
            { "channels": [], "samplers": [] }
        ]
    }"#;

    #[test]
    fn test_from_slice_reads_meshes_and_clips() {
        let model = ModelAsset::from_slice(MINIMAL_GLTF.as_bytes()).unwrap();
        assert_eq!(model.scene_count, 1);
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.meshes[0].name.as_deref(), Some("BookMesh"));
        assert_eq!(
            model.meshes[0].bounds,
            Some(Aabb::new(Vec3::new(-1.0, 0.0, -2.0), Vec3::new(1.0, 0.5, 2.0)))
        );
        assert_eq!(model.animations.len(), 2);
        assert_eq!(model.named_animations().count(), 1);
    }

    #[test]
    fn test_mesh_name_match_is_case_insensitive() {
        let model = ModelAsset::from_slice(MINIMAL_GLTF.as_bytes()).unwrap();
        assert!(model.meshes[0].name_contains("mesh"));
        assert!(!model.meshes[0].name_contains("cover"));
    }

    #[test]
    fn test_bounds_follow_parent_scale_and_rotation() {
        // Z-up export: scaled root with a child rotated -90 degrees about X
        let json = MINIMAL_GLTF.replace(
            r#""scenes": [ { "nodes": [0] } ],
        "nodes": [ { "name": "BookMesh", "mesh": 0 } ],"#,
            r#""scenes": [ { "nodes": [1] } ],
        "nodes": [
            { "name": "BookMesh", "mesh": 0, "rotation": [-0.70710677, 0.0, 0.0, 0.70710677] },
            { "name": "Root", "scale": [2.0, 2.0, 2.0], "translation": [0.0, 1.0, 0.0], "children": [0] }
        ],"#,
        );
        assert_ne!(json, MINIMAL_GLTF);
        let model = ModelAsset::from_slice(json.as_bytes()).unwrap();
        assert_eq!(model.meshes.len(), 1);

        let bounds = model.meshes[0].bounds.unwrap();
        let expected = Aabb::new(Vec3::new(-2.0, -3.0, -1.0), Vec3::new(2.0, 5.0, 0.0));
        for (got, want) in [(bounds.min, expected.min), (bounds.max, expected.max)] {
            assert!((got - want).length() < 1e-4, "{:?} != {:?}", got, want);
        }
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(
            ModelAsset::from_slice(b"not a model"),
            Err(AssetError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            ModelAsset::load_from_file(Path::new("/nonexistent/box_man.glb")),
            Err(AssetError::Io(_))
        ));
    }
}
