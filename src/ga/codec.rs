//! Real-valued chromosome codec for station placement and fleet allocation.
//!
//! # Encoding
//!
//! A flat vector of genes in `[0, 1]`, laid out left to right:
//!
//! | Segment | Genes | Decodes to |
//! |---------|-------|-----------|
//! | Movable stations | 2 per station (row, col) | `round(g × (dim − 1))` |
//! | Fleet ratio | 1, only when the mix is optimized | ambulances = `round(g × m)` |
//! | Vehicle slots | 1 per vehicle (`m` total) | station index `round(g × (N − 1))` |
//!
//! `round` breaks exact .5 ties to the even integer. Ambulance slots are
//! decoded before rapid-response slots. Station indices refer to stations
//! in ascending id order. Decoding is a pure function of the genotype.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{EmsError, Result};
use crate::models::{Allocation, GridCell, Station, StationId, VehicleClass};

/// How the ambulance / rapid-response split is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FleetMix {
    /// Chosen by a dedicated ratio gene.
    Optimized,
    /// Fixed counts; must sum to the fleet total.
    Fixed { ambulances: u32, rapid_response: u32 },
}

/// Grid dimensions for station coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDims {
    /// Number of rows.
    pub rows: u32,
    /// Number of columns.
    pub cols: u32,
}

impl GridDims {
    /// Creates grid dimensions.
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }
}

/// A decoded candidate configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// All stations, with movable ones at their decoded cells.
    pub stations: BTreeMap<StationId, Station>,
    /// Vehicle counts per station.
    pub allocation: Allocation,
}

/// Maps genotypes to [`Placement`]s.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementCodec {
    stations: BTreeMap<StationId, Station>,
    movable: Vec<StationId>,
    grid: GridDims,
    total_vehicles: u32,
    fleet_mix: FleetMix,
}

impl PlacementCodec {
    /// Creates a codec with an optimized fleet mix.
    ///
    /// # Arguments
    /// * `stations` - All stations; movable ones keep their id, their
    ///   location is overwritten on decode.
    /// * `movable` - Ids of stations whose location is searched.
    /// * `grid` - Grid dimensions for decoded coordinates.
    /// * `total_vehicles` - Fleet size `m`.
    ///
    /// # Errors
    /// [`EmsError::InvalidConfig`] if there are no stations, the grid is
    /// empty, or a movable id is duplicated or unknown.
    pub fn new(
        stations: BTreeMap<StationId, Station>,
        movable: Vec<StationId>,
        grid: GridDims,
        total_vehicles: u32,
    ) -> Result<Self> {
        if stations.is_empty() {
            return Err(EmsError::InvalidConfig("codec needs at least one station".into()));
        }
        if grid.rows == 0 || grid.cols == 0 {
            return Err(EmsError::InvalidConfig(format!(
                "grid must be non-empty, got {}x{}",
                grid.rows, grid.cols
            )));
        }
        let mut seen = HashSet::new();
        for id in &movable {
            if !seen.insert(*id) {
                return Err(EmsError::InvalidConfig(format!(
                    "movable station {id} listed twice"
                )));
            }
            if !stations.contains_key(id) {
                return Err(EmsError::InvalidConfig(format!(
                    "movable station {id} is not a known station"
                )));
            }
        }

        Ok(Self {
            stations,
            movable,
            grid,
            total_vehicles,
            fleet_mix: FleetMix::Optimized,
        })
    }

    /// Fixes the fleet mix, removing the ratio gene.
    ///
    /// # Errors
    /// [`EmsError::InvalidConfig`] if the counts do not sum to the fleet total.
    pub fn with_fixed_fleet(mut self, ambulances: u32, rapid_response: u32) -> Result<Self> {
        if ambulances + rapid_response != self.total_vehicles {
            return Err(EmsError::InvalidConfig(format!(
                "fixed fleet {ambulances}+{rapid_response} does not match total {}",
                self.total_vehicles
            )));
        }
        self.fleet_mix = FleetMix::Fixed {
            ambulances,
            rapid_response,
        };
        Ok(self)
    }

    /// Number of genes: `2·n + ratio + m`.
    pub fn chromosome_len(&self) -> usize {
        let ratio = match self.fleet_mix {
            FleetMix::Optimized => 1,
            FleetMix::Fixed { .. } => 0,
        };
        2 * self.movable.len() + ratio + self.total_vehicles as usize
    }

    /// Fleet size.
    pub fn total_vehicles(&self) -> u32 {
        self.total_vehicles
    }

    /// Fleet mix mode.
    pub fn fleet_mix(&self) -> FleetMix {
        self.fleet_mix
    }

    /// Ids of movable stations, in gene order.
    pub fn movable(&self) -> &[StationId] {
        &self.movable
    }

    /// Decodes a genotype.
    ///
    /// # Errors
    /// - [`EmsError::GenotypeLength`] if the length differs from
    ///   [`chromosome_len`](Self::chromosome_len).
    /// - [`EmsError::GeneOutOfRange`] if a gene is non-finite or outside [0, 1].
    pub fn decode(&self, genes: &[f64]) -> Result<Placement> {
        let expected = self.chromosome_len();
        if genes.len() != expected {
            return Err(EmsError::GenotypeLength {
                expected,
                actual: genes.len(),
            });
        }
        if let Some((index, &value)) = genes
            .iter()
            .enumerate()
            .find(|(_, g)| !(0.0..=1.0).contains(*g))
        {
            return Err(EmsError::GeneOutOfRange { index, value });
        }

        let mut cursor = genes.iter().copied();
        let mut next = || cursor.next().unwrap_or_default();

        let mut stations = self.stations.clone();
        for &id in &self.movable {
            let row = scale(next(), self.grid.rows) as i32;
            let col = scale(next(), self.grid.cols) as i32;
            stations.insert(id, Station::new(id, GridCell::new(row, col)));
        }

        let m = self.total_vehicles;
        let (ambulances, rapid_response) = match self.fleet_mix {
            FleetMix::Optimized => {
                let a = ((next() * m as f64).round_ties_even() as u32).min(m);
                (a, m - a)
            }
            FleetMix::Fixed {
                ambulances,
                rapid_response,
            } => (ambulances, rapid_response),
        };

        let station_ids: Vec<StationId> = stations.keys().copied().collect();
        let count = station_ids.len() as u32;
        let mut allocation = Allocation::empty_for(station_ids.iter().copied());

        let slots = std::iter::repeat(VehicleClass::Ambulance)
            .take(ambulances as usize)
            .chain(std::iter::repeat(VehicleClass::RapidResponse).take(rapid_response as usize));
        for class in slots {
            let idx = scale(next(), count);
            allocation.add(station_ids[idx], class);
        }

        Ok(Placement {
            stations,
            allocation,
        })
    }
}

/// Maps a gene in [0, 1] to an index in `0..size`.
fn scale(gene: f64, size: u32) -> usize {
    let max = size.saturating_sub(1);
    ((gene * max as f64).round_ties_even() as usize).min(max as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FleetCounts;

    fn base_stations() -> BTreeMap<StationId, Station> {
        [
            Station::new(0, (10, 10)),
            Station::new(1, (9, 12)),
            Station::new(2, (12, 9)),
            Station::new(3, (7, 7)),
        ]
        .into_iter()
        .map(|s| (s.id, s))
        .collect()
    }

    fn codec() -> PlacementCodec {
        PlacementCodec::new(base_stations(), vec![1, 2], GridDims::new(26, 22), 6).unwrap()
    }

    #[test]
    fn test_chromosome_len() {
        assert_eq!(codec().chromosome_len(), 2 * 2 + 1 + 6);
        let fixed = codec().with_fixed_fleet(4, 2).unwrap();
        assert_eq!(fixed.chromosome_len(), 2 * 2 + 6);
    }

    #[test]
    fn test_decode_layout() {
        // station 1 → (25, 0); station 2 → (0, 21); ratio 0.5 → 3 A / 3 R
        let genes = vec![
            1.0, 0.0, 0.0, 1.0, // stations
            0.5, // ratio
            0.0, 0.0, 1.0, // ambulances → idx 0, 0, 3
            0.34, 0.66, 0.5, // RRVs → idx 1, 2, 2 (1.5 rounds to even)
        ];
        let placement = codec().decode(&genes).unwrap();

        assert_eq!(placement.stations[&1].location, GridCell::new(25, 0));
        assert_eq!(placement.stations[&2].location, GridCell::new(0, 21));
        assert_eq!(placement.stations[&0].location, GridCell::new(10, 10));

        let a = &placement.allocation;
        assert_eq!(a.counts(0).ambulances, 2);
        assert_eq!(a.counts(3).ambulances, 1);
        assert_eq!(a.counts(1).rapid_response, 1);
        assert_eq!(a.counts(2).rapid_response, 2);
        assert_eq!(a.total_of(VehicleClass::Ambulance), 3);
        assert_eq!(a.total_of(VehicleClass::RapidResponse), 3);
    }

    #[test]
    fn test_ratio_extremes() {
        let c = codec();
        let mut genes = vec![0.5; c.chromosome_len()];
        genes[4] = 0.0;
        let all_rrv = c.decode(&genes).unwrap();
        assert_eq!(all_rrv.allocation.total_of(VehicleClass::Ambulance), 0);
        assert_eq!(all_rrv.allocation.total_of(VehicleClass::RapidResponse), 6);

        genes[4] = 1.0;
        let all_amb = c.decode(&genes).unwrap();
        assert_eq!(all_amb.allocation.total_of(VehicleClass::Ambulance), 6);
    }

    #[test]
    fn test_ties_round_to_even() {
        let stations: BTreeMap<StationId, Station> = [
            (0, Station::new(0, (0, 0))),
            (1, Station::new(1, (1, 1))),
            (2, Station::new(2, (2, 2))),
        ]
        .into_iter()
        .collect();
        let c = PlacementCodec::new(stations, vec![], GridDims::new(5, 5), 5).unwrap();

        // ratio 0.5 × 5 = 2.5 → 2; slots 0.25 × 2 = 0.5 → 0
        let genes = [0.5, 0.25, 0.25, 0.25, 0.25, 0.25];
        let placement = c.decode(&genes).unwrap();
        assert_eq!(placement.allocation.total_of(VehicleClass::Ambulance), 2);
        assert_eq!(placement.allocation.total_of(VehicleClass::RapidResponse), 3);
        assert_eq!(placement.allocation.counts(0), FleetCounts::new(2, 3));
        assert_eq!(placement.allocation.counts(1).total(), 0);

        // 0.75 × 2 = 1.5 → 2
        let genes = [0.5, 0.75, 0.75, 0.75, 0.75, 0.75];
        let placement = c.decode(&genes).unwrap();
        assert_eq!(placement.allocation.counts(2).total(), 5);
    }

    #[test]
    fn test_station_coordinate_ties() {
        let c = PlacementCodec::new(base_stations(), vec![1], GridDims::new(6, 4), 1)
            .unwrap()
            .with_fixed_fleet(1, 0)
            .unwrap();
        // rows: 0.5 × 5 = 2.5 → 2; cols: 0.5 × 3 = 1.5 → 2
        let placement = c.decode(&[0.5, 0.5, 0.0]).unwrap();
        assert_eq!(placement.stations[&1].location, GridCell::new(2, 2));
    }

    #[test]
    fn test_fixed_fleet() {
        let c = codec().with_fixed_fleet(4, 2).unwrap();
        let genes = vec![0.3; c.chromosome_len()];
        let placement = c.decode(&genes).unwrap();
        assert_eq!(placement.allocation.total_of(VehicleClass::Ambulance), 4);
        assert_eq!(placement.allocation.total_of(VehicleClass::RapidResponse), 2);

        assert!(codec().with_fixed_fleet(4, 4).is_err());
    }

    #[test]
    fn test_decode_idempotent_and_total_preserved() {
        let c = codec();
        for step in 0..=20 {
            let g = step as f64 / 20.0;
            let genes: Vec<f64> = (0..c.chromosome_len())
                .map(|i| ((i as f64 * 0.37 + g) % 1.0).abs())
                .collect();
            let first = c.decode(&genes).unwrap();
            let second = c.decode(&genes).unwrap();
            assert_eq!(first, second);
            assert_eq!(first.allocation.total(), 6);
            assert_eq!(first.stations.len(), 4);
        }
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let c = codec();
        let short = vec![0.5; c.chromosome_len() - 1];
        assert!(matches!(
            c.decode(&short),
            Err(EmsError::GenotypeLength { expected: 11, actual: 10 })
        ));
        let long = vec![0.5; c.chromosome_len() + 1];
        assert!(c.decode(&long).is_err());
    }

    #[test]
    fn test_out_of_range_gene_rejected() {
        let c = codec();
        let mut genes = vec![0.5; c.chromosome_len()];
        genes[3] = 1.2;
        assert!(matches!(
            c.decode(&genes),
            Err(EmsError::GeneOutOfRange { index: 3, .. })
        ));
        genes[3] = f64::NAN;
        assert!(c.decode(&genes).is_err());
    }

    #[test]
    fn test_invalid_codec_setup() {
        assert!(PlacementCodec::new(BTreeMap::new(), vec![], GridDims::new(5, 5), 2).is_err());
        assert!(PlacementCodec::new(base_stations(), vec![1, 1], GridDims::new(5, 5), 2).is_err());
        assert!(PlacementCodec::new(base_stations(), vec![9], GridDims::new(5, 5), 2).is_err());
        assert!(PlacementCodec::new(base_stations(), vec![], GridDims::new(0, 5), 2).is_err());
    }

    #[test]
    fn test_single_station_grid() {
        let stations: BTreeMap<StationId, Station> =
            [(0, Station::new(0, (0, 0)))].into_iter().collect();
        let c = PlacementCodec::new(stations, vec![0], GridDims::new(1, 1), 2).unwrap();
        let placement = c.decode(&[1.0, 1.0, 1.0, 1.0, 0.0]).unwrap();
        assert_eq!(placement.stations[&0].location, GridCell::new(0, 0));
        assert_eq!(placement.allocation.counts(0).total(), 2);
    }
}
