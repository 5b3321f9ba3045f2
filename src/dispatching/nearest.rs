//! Nearest-ETA greedy dispatch.

use super::{DispatchContext, DispatchPolicy};
use crate::models::{Call, Vehicle, VehicleClass, VehicleId};

/// Greedy nearest-ETA policy.
///
/// Sorts idle vehicles by ETA to the scene (ties by vehicle id) and takes
/// them in that order, filling ambulance and rapid-response needs from
/// their own class until both are met. If either need cannot be met, the
/// call is not dispatched at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestEta;

impl DispatchPolicy for NearestEta {
    fn name(&self) -> &'static str {
        "NEAREST_ETA"
    }

    fn dispatch(
        &self,
        call: &Call,
        vehicles: &[Vehicle],
        context: &DispatchContext<'_>,
    ) -> Option<Vec<VehicleId>> {
        let mut idle: Vec<(f64, &Vehicle)> = vehicles
            .iter()
            .filter(|v| !v.is_busy())
            .map(|v| {
                let eta = context
                    .travel
                    .travel_time_s(v.location, call.scene, context.now_s, v.class);
                (eta, v)
            })
            .collect();
        idle.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));

        let mut need_ambulances = call.need_ambulances;
        let mut need_rapid = call.need_rapid_response;
        let mut assigned = Vec::with_capacity(call.total_need() as usize);

        for (_, vehicle) in idle {
            if need_ambulances == 0 && need_rapid == 0 {
                break;
            }
            match vehicle.class {
                VehicleClass::Ambulance if need_ambulances > 0 => {
                    need_ambulances -= 1;
                    assigned.push(vehicle.id);
                }
                VehicleClass::RapidResponse if need_rapid > 0 => {
                    need_rapid -= 1;
                    assigned.push(vehicle.id);
                }
                _ => {}
            }
        }

        if need_ambulances == 0 && need_rapid == 0 && !assigned.is_empty() {
            Some(assigned)
        } else {
            None
        }
    }

    fn description(&self) -> &'static str {
        "Nearest idle vehicles by estimated time of arrival"
    }
}
