//! The mesh: immutable topology, cached bounding boxes, resolved coordinates,
//! and the owned dataset collection.
//!
//! Invariants
//! - `nodes`/`elements` never change after construction.
//! - `resolved` always holds the coordinates spatial queries use: raw
//!   coordinates without a transform, transformed ones otherwise. It is
//!   rebuilt whenever the transform changes.

use std::fmt;
use std::sync::Arc;

use nalgebra::Vector2;

use super::interp::InterpCfg;
use super::transform::CoordTransform;
use super::types::{DatasetId, Element, ElementKind, Node, OutputRef};
use crate::dataset::{Centering, Dataset, Output};
use crate::error::{DatasetError, MeshError, TransformError};
use crate::geom2::{centroid, BBox, GeomCfg};

/// Coordinates and boxes in the frame used for spatial queries.
#[derive(Clone, Debug, Default)]
struct Resolved {
    xy: Vec<Vector2<f64>>,
    bboxes: Vec<BBox>,
    extent: BBox,
}

impl Resolved {
    fn build(xy: Vec<Vector2<f64>>, elements: &[Element]) -> Self {
        let bboxes: Vec<BBox> = elements
            .iter()
            .map(|e| BBox::from_points(e.nodes().iter().map(|&n| xy[n])))
            .collect();
        let extent = BBox::from_points(xy.iter().copied());
        Self { xy, bboxes, extent }
    }
}

/// Unstructured 2D mesh with its datasets.
#[derive(Clone)]
pub struct Mesh {
    nodes: Vec<Node>,
    elements: Vec<Element>,
    raw_bboxes: Vec<BBox>,
    raw_extent: BBox,
    resolved: Resolved,
    transform: Option<Arc<dyn CoordTransform>>,
    datasets: Vec<Dataset>,
    pub(crate) geom: GeomCfg,
    pub(crate) interp: InterpCfg,
}

impl fmt::Debug for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("nodes", &self.nodes.len())
            .field("elements", &self.elements.len())
            .field("datasets", &self.datasets.len())
            .field("extent", &self.resolved.extent)
            .field("has_transform", &self.transform.is_some())
            .finish_non_exhaustive()
    }
}

impl Mesh {
    /// Build from loader-supplied topology; every node index must be in range.
    pub fn new(nodes: Vec<Node>, elements: Vec<Element>) -> Result<Self, MeshError> {
        for (ei, e) in elements.iter().enumerate() {
            if let Some(&bad) = e.nodes().iter().find(|&&n| n >= nodes.len()) {
                return Err(MeshError::NodeOutOfRange {
                    element: ei,
                    node: bad,
                    node_count: nodes.len(),
                });
            }
        }
        let resolved = Resolved::build(nodes.iter().map(|n| n.xy).collect(), &elements);
        Ok(Self {
            raw_bboxes: resolved.bboxes.clone(),
            raw_extent: resolved.extent,
            resolved,
            nodes,
            elements,
            transform: None,
            datasets: Vec::new(),
            geom: GeomCfg::default(),
            interp: InterpCfg::default(),
        })
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
    #[inline]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
    #[inline]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn element_count_for_kind(&self, kind: ElementKind) -> usize {
        self.elements.iter().filter(|e| e.kind() == kind).count()
    }

    /// Query-frame coordinates of node `i`.
    #[inline]
    pub fn node_xy(&self, i: usize) -> Vector2<f64> {
        self.resolved.xy[i]
    }

    /// Query-frame bounding box of element `i` (empty for `Undefined`).
    #[inline]
    pub fn bbox(&self, i: usize) -> &BBox {
        &self.resolved.bboxes[i]
    }

    /// Bounding box of element `i` in source coordinates.
    #[inline]
    pub fn raw_bbox(&self, i: usize) -> &BBox {
        &self.raw_bboxes[i]
    }

    /// Query-frame extent of the whole mesh.
    #[inline]
    pub fn extent(&self) -> BBox {
        self.resolved.extent
    }

    #[inline]
    pub fn raw_extent(&self) -> BBox {
        self.raw_extent
    }

    /// Query-frame vertices of element `i`, in element order.
    pub fn element_xy(&self, i: usize) -> Vec<Vector2<f64>> {
        self.elements[i]
            .nodes()
            .iter()
            .map(|&n| self.resolved.xy[n])
            .collect()
    }

    /// Vertex mean of element `i` in the query frame.
    pub fn element_centroid(&self, i: usize) -> Vector2<f64> {
        centroid(&self.element_xy(i))
    }

    #[inline]
    pub fn geom_cfg(&self) -> GeomCfg {
        self.geom
    }
    pub fn set_geom_cfg(&mut self, cfg: GeomCfg) {
        self.geom = cfg;
    }
    #[inline]
    pub fn interp_cfg(&self) -> InterpCfg {
        self.interp
    }
    pub fn set_interp_cfg(&mut self, cfg: InterpCfg) {
        self.interp = cfg;
    }

    // ----- reprojection -----

    #[inline]
    pub fn has_transform(&self) -> bool {
        self.transform.is_some()
    }

    /// Install a transform and rebuild resolved coordinates and boxes.
    ///
    /// On failure the mesh falls back to raw coordinates.
    pub fn set_transform<T>(&mut self, transform: T) -> Result<(), TransformError>
    where
        T: CoordTransform + 'static,
    {
        let transform: Arc<dyn CoordTransform> = Arc::new(transform);
        let mut xy = Vec::with_capacity(self.nodes.len());
        for (i, n) in self.nodes.iter().enumerate() {
            match transform.transform(n.xy) {
                Some(p) if p.x.is_finite() && p.y.is_finite() => xy.push(p),
                _ => {
                    tracing::warn!(node = i, "coordinate transform failed; using raw coordinates");
                    self.clear_transform();
                    return Err(TransformError::NodeFailed { node: i });
                }
            }
        }
        self.resolved = Resolved::build(xy, &self.elements);
        self.transform = Some(transform);
        tracing::debug!(
            nodes = self.nodes.len(),
            min_x = self.resolved.extent.min.x,
            min_y = self.resolved.extent.min.y,
            max_x = self.resolved.extent.max.x,
            max_y = self.resolved.extent.max.y,
            "installed coordinate transform"
        );
        Ok(())
    }

    /// Back to raw coordinates.
    pub fn clear_transform(&mut self) {
        self.transform = None;
        self.resolved = Resolved {
            xy: self.nodes.iter().map(|n| n.xy).collect(),
            bboxes: self.raw_bboxes.clone(),
            extent: self.raw_extent,
        };
    }

    // ----- datasets -----

    #[inline]
    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    /// First dataset with this name.
    pub fn dataset(&self, name: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.name() == name)
    }

    pub fn dataset_id(&self, name: &str) -> Option<DatasetId> {
        self.datasets.iter().position(|d| d.name() == name).map(DatasetId)
    }

    #[inline]
    pub fn dataset_by_id(&self, id: DatasetId) -> Option<&Dataset> {
        self.datasets.get(id.0)
    }

    pub fn output(&self, r: OutputRef) -> Option<&Output> {
        self.dataset_by_id(r.dataset)?.output(r.step)
    }

    /// Number of values an output with this centering holds on this mesh.
    #[inline]
    pub fn location_count(&self, centering: Centering) -> usize {
        match centering {
            Centering::Node => self.nodes.len(),
            Centering::Element => self.elements.len(),
        }
    }

    /// Take ownership of a dataset after checking its outputs fit this mesh.
    pub fn add_dataset(&mut self, dataset: Dataset) -> Result<DatasetId, DatasetError> {
        for (step, o) in dataset.outputs().iter().enumerate() {
            let expected = self.location_count(o.centering());
            if o.len() != expected {
                return Err(DatasetError::SizeMismatch {
                    dataset: dataset.name().to_string(),
                    step,
                    got: o.len(),
                    expected,
                });
            }
            if o.active().len() != self.elements.len() {
                return Err(DatasetError::ActiveSizeMismatch {
                    got: o.active().len(),
                    expected: self.elements.len(),
                });
            }
        }
        tracing::debug!(
            name = dataset.name(),
            outputs = dataset.output_count(),
            "attached dataset"
        );
        self.datasets.push(dataset);
        Ok(DatasetId(self.datasets.len() - 1))
    }
}
