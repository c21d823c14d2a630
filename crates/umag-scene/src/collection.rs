//! Realized scenes and the field-source seam.

use crate::magnet::BoxMagnet;
use crate::record::SceneRecord;
use umag_core::{vector, Vec3};
use umag_grid::ObjectGrid;

/// Something that produces a magnetic field and can be moved rigidly.
///
/// Field views only talk to scenes through this trait, so tests can
/// substitute recording or synthetic sources.
pub trait FieldSource {
    /// Flux density (tesla) at each of `positions` (metres).
    fn evaluate_field(&self, positions: &[Vec3]) -> Vec<Vec3>;

    /// Rigidly move all geometry by `displacement` (metres). Two opposite
    /// calls cancel exactly.
    fn translate_geometry(&mut self, displacement: Vec3);
}

/// A field-ready scene: magnets, external field and qubit positions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MagnetCollection {
    magnets: Vec<BoxMagnet>,
    external_field: Vec3,
    observation_points: Vec<Vec3>,
    offset: Vec3,
}

impl MagnetCollection {
    /// Build from a record, applying its magnetisation to every volume.
    pub fn from_record(record: &SceneRecord) -> Self {
        Self {
            magnets: record
                .volumes
                .iter()
                .map(|&v| BoxMagnet::new(v, record.magnetisation))
                .collect(),
            external_field: record.external_field,
            observation_points: record.observation_points.clone(),
            offset: [0.0; 3],
        }
    }

    /// Add a magnet.
    pub fn push(&mut self, magnet: BoxMagnet) {
        self.magnets.push(magnet);
    }

    /// The magnets as built, without the current offset.
    pub fn magnets(&self) -> &[BoxMagnet] {
        &self.magnets
    }

    /// Qubit positions (metres).
    pub fn observation_points(&self) -> &[Vec3] {
        &self.observation_points
    }

    /// Uniform external field (tesla).
    pub fn external_field(&self) -> Vec3 {
        self.external_field
    }

    /// Net displacement applied through
    /// [`translate_geometry`](FieldSource::translate_geometry).
    pub fn offset(&self) -> Vec3 {
        self.offset
    }
}

impl FieldSource for MagnetCollection {
    fn evaluate_field(&self, positions: &[Vec3]) -> Vec<Vec3> {
        positions
            .iter()
            .map(|&p| {
                // Moving the geometry by `offset` is probing at `p - offset`.
                let local = vector::sub(p, self.offset);
                self.magnets
                    .iter()
                    .fold(self.external_field, |b, m| vector::add(b, m.field_at(local)))
            })
            .collect()
    }

    fn translate_geometry(&mut self, displacement: Vec3) {
        self.offset = vector::add(self.offset, displacement);
    }
}

/// Realize every record of a grid into a [`MagnetCollection`].
pub fn realize(grid: &ObjectGrid<SceneRecord>) -> ObjectGrid<MagnetCollection> {
    log::debug!("realizing {} scene(s) of grid {:?}", grid.len(), grid.shape());
    grid.map(MagnetCollection::from_record)
}
