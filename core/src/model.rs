use std::fmt;
use std::rc::Rc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::geometry::{Aabb, Geometry, Primitive, Transform};
use crate::scene::Scene;

/// Asset layout of `assets/cube.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelAsset {
    pub name: String,
    pub pieces: Vec<PieceAsset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieceAsset {
    pub name: String,
    #[serde(default)]
    pub translation: [f32; 3],
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub primitives: Vec<PrimitiveAsset>,
    pub materials: Vec<Material>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PrimitiveAsset {
    pub start: usize,
    pub count: usize,
    pub material: usize,
}

/// Surface color in sRGB, each channel in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub color: [f32; 3],
}

#[derive(Debug, Clone)]
pub struct ModelPiece {
    pub name: String,
    pub transform: Transform,
    pub geometry: Rc<Geometry>,
    pub materials: Vec<Material>,
}

/// Read-only template every mount is cloned from.
#[derive(Debug, Clone)]
pub struct CubeModel {
    pub name: String,
    pub pieces: Vec<ModelPiece>,
}

impl CubeModel {
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let asset: ModelAsset = serde_json::from_str(text).map_err(ModelError::Json)?;
        Self::from_asset(asset)
    }

    pub fn from_asset(asset: ModelAsset) -> Result<Self, ModelError> {
        if asset.pieces.is_empty() {
            return Err(ModelError::EmptyModel);
        }
        let pieces = asset
            .pieces
            .into_iter()
            .map(build_piece)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: asset.name,
            pieces,
        })
    }

    /// Fresh scene: geometry is shared, materials are copied per mount.
    pub fn mount(&self) -> Scene {
        let mut scene = Scene::new();
        for piece in &self.pieces {
            scene.add_piece(
                piece.name.clone(),
                Rc::clone(&piece.geometry),
                piece.materials.clone(),
                piece.transform,
            );
        }
        scene
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }
}

fn build_piece(asset: PieceAsset) -> Result<ModelPiece, ModelError> {
    let vertices: Vec<Vec3> = asset.vertices.iter().copied().map(Vec3::from).collect();
    let Some(bounds) = Aabb::from_points(&vertices) else {
        return Err(ModelError::EmptyPiece { piece: asset.name });
    };
    if let Some(&index) = asset
        .indices
        .iter()
        .find(|&&index| index as usize >= vertices.len())
    {
        return Err(ModelError::IndexOutOfRange {
            piece: asset.name,
            index,
            vertex_count: vertices.len(),
        });
    }
    let mut primitives = Vec::with_capacity(asset.primitives.len());
    for (idx, prim) in asset.primitives.iter().enumerate() {
        let in_range = prim
            .start
            .checked_add(prim.count)
            .is_some_and(|end| end <= asset.indices.len());
        if !in_range || prim.count % 3 != 0 {
            return Err(ModelError::MalformedPrimitive {
                piece: asset.name,
                primitive: idx,
            });
        }
        if prim.material >= asset.materials.len() {
            return Err(ModelError::MissingMaterial {
                piece: asset.name,
                material: prim.material,
            });
        }
        primitives.push(Primitive {
            start: prim.start,
            count: prim.count,
            material: prim.material,
        });
    }
    Ok(ModelPiece {
        transform: Transform::from_translation(Vec3::from(asset.translation)),
        geometry: Rc::new(Geometry {
            vertices,
            indices: asset.indices,
            primitives,
            bounds,
        }),
        materials: asset.materials,
        name: asset.name,
    })
}

#[derive(Debug)]
pub enum ModelError {
    Json(serde_json::Error),
    EmptyModel,
    EmptyPiece {
        piece: String,
    },
    IndexOutOfRange {
        piece: String,
        index: u32,
        vertex_count: usize,
    },
    MalformedPrimitive {
        piece: String,
        primitive: usize,
    },
    MissingMaterial {
        piece: String,
        material: usize,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Json(err) => write!(f, "model json: {err}"),
            ModelError::EmptyModel => write!(f, "model has no pieces"),
            ModelError::EmptyPiece { piece } => write!(f, "piece {piece} has no vertices"),
            ModelError::IndexOutOfRange {
                piece,
                index,
                vertex_count,
            } => write!(
                f,
                "piece {piece} references vertex {index} but has {vertex_count}"
            ),
            ModelError::MalformedPrimitive { piece, primitive } => {
                write!(f, "piece {piece} primitive {primitive} is not a triangle range")
            }
            ModelError::MissingMaterial { piece, material } => {
                write!(f, "piece {piece} uses missing material {material}")
            }
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Json(err) => Some(err),
            _ => None,
        }
    }
}
