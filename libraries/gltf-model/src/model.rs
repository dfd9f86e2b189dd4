use std::{fs, mem::offset_of, path::Path};

use anyhow::{bail, Context};
use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3, Vec4};
use gltf::{buffer, mesh::Mode, Gltf, Node};
use lib_geometry::Aabb;
use log::{debug, trace};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Default)]
pub struct Vertex {
    // Geometric properties
    pub position: Vec4,
    // ---- 16 byte alignment
    pub normal: Vec4,
    // Material properties
    // ---- 16 byte alignment
    pub base_color_factor: Vec4,
}

impl Vertex {
    pub(crate) fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: offset_of!(Vertex, position) as wgpu::BufferAddress,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: offset_of!(Vertex, normal) as wgpu::BufferAddress,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: offset_of!(Vertex, base_color_factor) as wgpu::BufferAddress,
                    shader_location: 2,
                },
            ],
        }
    }
}

/// Triangle list of a single glTF primitive with all node transforms applied.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub label: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// CPU-side copy of a whole scene, flattened into world space.
#[derive(Clone, Debug, Default)]
pub struct Model {
    pub meshes: Vec<MeshData>,
    /// `None` if the scene contains no vertices at all.
    pub bounds: Option<Aabb>,
}

impl Model {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.vertices.len()).sum()
    }
}

/// Loads a `.gltf` (with external buffers) or `.glb` file from disk.
///
/// # Errors
///
/// Fails if the file or one of its buffers cannot be read, or if the content is no valid glTF.
pub fn load_model(model_path: &Path) -> anyhow::Result<Model> {
    let bytes = fs::read(model_path)
        .with_context(|| format!("failed to read model file {}", model_path.display()))?;
    let gltf = Gltf::from_slice(&bytes)
        .with_context(|| format!("failed to parse model file {}", model_path.display()))?;

    let buffer_data = load_buffers(&gltf, model_path)?;

    let mut meshes = Vec::new();
    if let Some(scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) {
        debug!(
            "loading scene {} of {}",
            scene.name().unwrap_or("<unnamed>"),
            model_path.display()
        );
        for node in scene.nodes() {
            visit_node(&node, Mat4::IDENTITY, &buffer_data, &mut meshes);
        }
    }

    let bounds = meshes
        .iter()
        .filter_map(|mesh| {
            Aabb::from_points(mesh.vertices.iter().map(|vertex| vertex.position.truncate()))
        })
        .reduce(Aabb::union);

    Ok(Model { meshes, bounds })
}

fn load_buffers(gltf: &Gltf, model_path: &Path) -> anyhow::Result<Vec<Vec<u8>>> {
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            buffer::Source::Bin => {
                let Some(blob) = gltf.blob.as_deref() else {
                    bail!("model refers to a binary chunk but has none");
                };
                buffer_data.push(blob.to_vec());
            }
            buffer::Source::Uri(uri) if uri.starts_with("data:") => {
                bail!("embedded data URIs are not supported, use .glb or external buffers");
            }
            buffer::Source::Uri(uri) => {
                let path = model_path.with_file_name(uri);
                let bin = fs::read(&path)
                    .with_context(|| format!("failed to read buffer {}", path.display()))?;
                buffer_data.push(bin);
            }
        }
    }
    Ok(buffer_data)
}

fn visit_node(
    node: &Node<'_>,
    parent_transform: Mat4,
    buffer_data: &[Vec<u8>],
    meshes: &mut Vec<MeshData>,
) {
    let transform = parent_transform * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();

        for primitive in mesh.primitives() {
            let label = format!("{}#{}", mesh.name().unwrap_or("mesh"), primitive.index());
            if primitive.mode() != Mode::Triangles {
                debug!(
                    "skipping {label}: unsupported primitive mode {:?}",
                    primitive.mode()
                );
                continue;
            }

            let reader =
                primitive.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));
            let Some(positions) = reader.read_positions() else {
                debug!("skipping {label}: no positions");
                continue;
            };
            let mut normals = reader.read_normals();
            let base_color_factor =
                Vec4::from(primitive.material().pbr_metallic_roughness().base_color_factor());

            let vertices = positions
                .map(|position| {
                    let normal = normals
                        .as_mut()
                        .and_then(Iterator::next)
                        .map_or(Vec3::Y, Vec3::from);

                    Vertex {
                        position: (transform.transform_point3(Vec3::from(position)), 1.0).into(),
                        normal: ((normal_matrix * normal).normalize_or_zero(), 0.0).into(),
                        base_color_factor,
                    }
                })
                .collect::<Vec<_>>();

            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..u32::try_from(vertices.len()).unwrap_or(u32::MAX)).collect(),
            };

            trace!("{label}: {} vertices, {} indices", vertices.len(), indices.len());
            meshes.push(MeshData {
                label,
                vertices,
                indices,
            });
        }
    }

    for child in node.children() {
        visit_node(&child, transform, buffer_data, meshes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SCENE_JSON: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0] } ],
        "nodes": [ { "mesh": 0, "translation": [1.0, 0.5, 0.0] } ],
        "meshes": [ { "name": "floor", "primitives": [ { "attributes": { "POSITION": 0 }, "indices": 1, "material": 0 } ] } ],
        "materials": [ { "pbrMetallicRoughness": { "baseColorFactor": [0.5, 0.25, 1.0, 1.0] } } ],
        "buffers": [ { "uri": "room.bin", "byteLength": 72 } ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 48, "target": 34962 },
            { "buffer": 0, "byteOffset": 48, "byteLength": 24, "target": 34963 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 4, "type": "VEC3", "min": [-2.0, 0.0, -3.0], "max": [2.0, 2.5, 3.0] },
            { "bufferView": 1, "componentType": 5125, "count": 6, "type": "SCALAR" }
        ]
    }"#;

    fn write_scene(dir: &Path) -> std::path::PathBuf {
        let positions: [[f32; 3]; 4] = [
            [-2.0, 0.0, -3.0],
            [2.0, 0.0, -3.0],
            [2.0, 2.5, 3.0],
            [-2.0, 2.5, 3.0],
        ];
        let indices: [u32; 6] = [0, 1, 2, 0, 2, 3];

        let mut bin = fs::File::create(dir.join("room.bin")).unwrap();
        bin.write_all(bytemuck::cast_slice(&positions)).unwrap();
        bin.write_all(bytemuck::cast_slice(&indices)).unwrap();

        let gltf_path = dir.join("room.gltf");
        fs::write(&gltf_path, SCENE_JSON).unwrap();
        gltf_path
    }

    #[test]
    fn loads_meshes_in_world_space() {
        let dir = tempfile::tempdir().unwrap();
        let model = load_model(&write_scene(dir.path())).unwrap();

        assert_eq!(model.meshes.len(), 1, "one primitive");
        let mesh = &model.meshes[0];
        assert_eq!(mesh.label, "floor#0", "label");
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3], "indices");
        assert_eq!(model.vertex_count(), 4, "vertices");
        assert_eq!(
            mesh.vertices[0].position,
            Vec4::new(-1.0, 0.5, -3.0, 1.0),
            "node translation applied"
        );
        assert_eq!(
            mesh.vertices[0].base_color_factor,
            Vec4::new(0.5, 0.25, 1.0, 1.0),
            "material color"
        );
        assert_eq!(
            mesh.vertices[0].normal,
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            "default normal"
        );
    }

    #[test]
    fn bounds_cover_translated_geometry() {
        let dir = tempfile::tempdir().unwrap();
        let model = load_model(&write_scene(dir.path())).unwrap();

        let bounds = model.bounds.unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, 0.5, -3.0), "min corner");
        assert_eq!(bounds.max, Vec3::new(3.0, 3.0, 3.0), "max corner");
    }

    #[test]
    fn missing_buffer_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let gltf_path = write_scene(dir.path());
        fs::remove_file(dir.path().join("room.bin")).unwrap();

        let error = load_model(&gltf_path).unwrap_err();
        assert!(
            format!("{error:#}").contains("room.bin"),
            "error should name the buffer: {error:#}"
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(
            load_model(&dir.path().join("nowhere.glb")).is_err(),
            "loading must fail"
        );
    }

    #[test]
    fn bundled_room_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/models/room.glb");
        let model = load_model(&path).unwrap();

        assert_eq!(model.meshes.len(), 6, "floor, ceiling and four walls");
        let bounds = model.bounds.unwrap();
        assert!(
            bounds.min.abs_diff_eq(Vec3::new(-3.0, 0.0, -4.0), 1e-6),
            "min corner: {}",
            bounds.min
        );
        assert!(
            bounds.max.abs_diff_eq(Vec3::new(3.0, 2.8, 4.0), 1e-6),
            "max corner: {}",
            bounds.max
        );
    }
}
