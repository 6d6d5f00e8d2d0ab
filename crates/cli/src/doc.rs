//! JSON mesh document used by the CLI (fixtures and demo runs only).
//!
//! Elements list node indices; the shape follows from the count (0 undefined,
//! 2 line, 3 triangle, 4 quad, more polygon).

use anyhow::{Context, Result};
use meshcalc::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MeshDoc {
    pub nodes: Vec<NodeDoc>,
    pub elements: Vec<ElementDoc>,
    #[serde(default)]
    pub datasets: Vec<DatasetDoc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct NodeDoc {
    pub id: i64,
    pub x: f64,
    pub y: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ElementDoc {
    pub id: i64,
    pub nodes: Vec<usize>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CenteringDoc {
    Node,
    Element,
}

impl From<CenteringDoc> for Centering {
    fn from(c: CenteringDoc) -> Self {
        match c {
            CenteringDoc::Node => Centering::Node,
            CenteringDoc::Element => Centering::Element,
        }
    }
}

impl From<Centering> for CenteringDoc {
    fn from(c: Centering) -> Self {
        match c {
            Centering::Node => CenteringDoc::Node,
            Centering::Element => CenteringDoc::Element,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DatasetDoc {
    pub name: String,
    pub centering: CenteringDoc,
    #[serde(default)]
    pub time_varying: bool,
    #[serde(default)]
    pub vector: bool,
    pub outputs: Vec<OutputDoc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutputDoc {
    #[serde(default)]
    pub time: f64,
    /// Scalar values; ignored for vector datasets.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vectors: Option<Vec<[f64; 2]>>,
    /// One flag per element; omitted means all active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<Vec<bool>>,
}

impl MeshDoc {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        fs::write(path, serde_json::to_vec_pretty(self)?)
            .with_context(|| format!("writing {}", path.display()))
    }

    /// Build the mesh and attach every dataset.
    pub fn into_mesh(self) -> Result<Mesh> {
        let nodes = self
            .nodes
            .iter()
            .map(|n| Node::new(n.id, n.x, n.y))
            .collect();
        let elements = self
            .elements
            .iter()
            .map(|e| {
                Element::from_nodes(e.id, &e.nodes).with_context(|| format!("element id {}", e.id))
            })
            .collect::<Result<Vec<_>>>()?;
        let mut mesh = Mesh::new(nodes, elements)?;
        for d in self.datasets {
            let ds = d
                .to_dataset(&mesh)
                .with_context(|| format!("dataset `{}`", d.name))?;
            mesh.add_dataset(ds)?;
        }
        Ok(mesh)
    }

    /// Snapshot of a mesh in source coordinates.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        Self {
            nodes: mesh
                .nodes()
                .iter()
                .map(|n| NodeDoc {
                    id: n.id,
                    x: n.xy.x,
                    y: n.xy.y,
                })
                .collect(),
            elements: mesh
                .elements()
                .iter()
                .map(|e| ElementDoc {
                    id: e.id,
                    nodes: e.nodes().to_vec(),
                })
                .collect(),
            datasets: mesh.datasets().iter().map(DatasetDoc::from_dataset).collect(),
        }
    }
}

impl DatasetDoc {
    fn to_dataset(&self, mesh: &Mesh) -> Result<Dataset> {
        let centering = Centering::from(self.centering);
        let mut ds = Dataset::new(self.name.as_str(), self.vector, self.time_varying);
        for (step, o) in self.outputs.iter().enumerate() {
            let out = if self.vector {
                let vectors = o
                    .vectors
                    .as_ref()
                    .with_context(|| format!("output {step} has no vectors"))?
                    .iter()
                    .map(|&[x, y]| Vec2::new(x, y))
                    .collect();
                Output::from_vectors(mesh, centering, o.time, vectors)?
            } else {
                Output::from_scalars(mesh, centering, o.time, o.values.clone())?
            };
            let out = match &o.active {
                Some(active) => out.with_active(active.clone())?,
                None => out,
            };
            ds.add_output(out).with_context(|| format!("output {step}"))?;
        }
        Ok(ds)
    }

    pub fn from_dataset(ds: &Dataset) -> Self {
        let outputs = ds
            .outputs()
            .iter()
            .map(|o| OutputDoc {
                time: o.time(),
                values: if o.is_vector() {
                    Vec::new()
                } else {
                    o.values().to_vec()
                },
                vectors: o
                    .vectors()
                    .map(|vs| vs.iter().map(|v| [v.x, v.y]).collect()),
                active: o.active().contains(&false).then(|| o.active().to_vec()),
            })
            .collect();
        Self {
            name: ds.name().to_string(),
            centering: ds.centering().unwrap_or(Centering::Node).into(),
            time_varying: ds.is_time_varying(),
            vector: ds.is_vector(),
            outputs,
        }
    }
}
