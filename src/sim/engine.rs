//! Event-driven dispatch simulation.
//!
//! # Call Lifecycle
//!
//! ```text
//! WAITING ──dispatch──▶ ASSIGNED ──first arrival──▶ ON_SCENE
//!    ▲                                                 │ scene departure
//!    └── wait list (FIFO)          TRANSPORTING ◀──────┤ (ambulance + hospital time)
//!                                        │             │
//!                                        └─job complete┴──▶ COMPLETE
//! ```
//!
//! Busy/idle transitions are driven only by scene-departure and
//! job-complete events. Location updates move vehicles along their
//! routes for observability and never gate availability.
//!
//! # Run Phases
//! 1. Warm-up: calls in `[start - warmup, start)` are simulated without
//!    recording statistics, so the fleet is realistically busy.
//! 2. Measured: calls in `[start, end)` are simulated; every dispatch made
//!    in this phase records a response time. Events at or after `end` are
//!    left unprocessed.

use std::collections::{BTreeMap, HashMap, VecDeque};

use log::{debug, info, trace};

use super::event::{Event, EventKind, EventQueue};
use super::kpi::SurvivalKpi;
use super::SimConfig;
use crate::dispatching::{DispatchContext, DispatchPolicy, NearestEta};
use crate::error::{EmsError, Result};
use crate::models::{
    Call, CallId, GridCell, Station, StationId, Vehicle, VehicleClass, VehicleId, VehicleStatus,
};
use crate::travel::TravelModel;
use crate::validation::validate_input;

static DEFAULT_POLICY: NearestEta = NearestEta;

/// A single-threaded dispatch simulation over one fleet configuration.
///
/// Owns all mutable vehicle state for the duration of a run. Calls and
/// the travel model are borrowed and never mutated, so many simulations
/// can share them in parallel.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use u_ems::models::{Call, GridCell, Station, Vehicle};
/// use u_ems::sim::Simulation;
/// use u_ems::travel::LatticeTravelModel;
///
/// let travel = LatticeTravelModel::new(26, 22, 2.0).with_default_speed(60.0);
/// let stations: BTreeMap<_, _> = [(0, Station::new(0, (10, 10)))].into_iter().collect();
/// let vehicles = vec![Vehicle::ambulance(0, 0, GridCell::new(10, 10))];
/// let calls = vec![Call::new(1, 1_000.0, GridCell::new(10, 12), GridCell::new(5, 5))
///     .with_dispatch_delay(30.0)];
///
/// let mut sim = Simulation::new(&calls, stations, vehicles, &travel).unwrap();
/// sim.run(1_000.0, 4_600.0, 0.0).unwrap();
/// let response = sim.response_time(1).unwrap();
/// assert!((response - 270.0).abs() < 1e-9);
/// ```
pub struct Simulation<'a> {
    calls: Vec<&'a Call>,
    call_index: HashMap<CallId, usize>,
    stations: BTreeMap<StationId, Station>,
    vehicles: Vec<Vehicle>,
    vehicle_index: HashMap<VehicleId, usize>,
    homes: Vec<GridCell>,
    travel: &'a dyn TravelModel,
    policy: &'a dyn DispatchPolicy,
    config: SimConfig,
    events: EventQueue,
    wait_list: VecDeque<CallId>,
    now_s: f64,
    recording: bool,
    response_times: BTreeMap<CallId, f64>,
    assignments: HashMap<CallId, Vec<VehicleId>>,
}

impl<'a> Simulation<'a> {
    /// Creates a simulation after validating the inputs.
    ///
    /// Vehicles are kept in an arena ordered by id; calls are ordered by
    /// `(arrival, id)`. Every [`run`](Self::run) starts each vehicle idle at
    /// its home station, so the `location`, `status` and `route` a vehicle
    /// carries in are discarded.
    ///
    /// # Errors
    /// [`EmsError::Validation`] if the inputs fail structural checks.
    pub fn new(
        calls: &'a [Call],
        stations: BTreeMap<StationId, Station>,
        mut vehicles: Vec<Vehicle>,
        travel: &'a dyn TravelModel,
    ) -> Result<Self> {
        validate_input(calls, &stations, &vehicles).map_err(EmsError::Validation)?;

        let mut ordered: Vec<&'a Call> = calls.iter().collect();
        ordered.sort_by(|a, b| a.arrival_s.total_cmp(&b.arrival_s).then(a.id.cmp(&b.id)));
        let call_index = ordered.iter().enumerate().map(|(i, c)| (c.id, i)).collect();

        vehicles.sort_by_key(|v| v.id);
        let vehicle_index = vehicles.iter().enumerate().map(|(i, v)| (v.id, i)).collect();
        let homes = vehicles
            .iter()
            .map(|v| stations[&v.home_station].location)
            .collect();

        Ok(Self {
            calls: ordered,
            call_index,
            stations,
            vehicles,
            vehicle_index,
            homes,
            travel,
            policy: &DEFAULT_POLICY,
            config: SimConfig::default(),
            events: EventQueue::new(),
            wait_list: VecDeque::new(),
            now_s: 0.0,
            recording: false,
            response_times: BTreeMap::new(),
            assignments: HashMap::new(),
        })
    }

    /// Replaces the dispatch policy (default: [`NearestEta`]).
    pub fn with_policy(mut self, policy: &'a dyn DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the simulation configuration.
    pub fn with_config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs warm-up and measured phases and returns the KPIs.
    ///
    /// All run state is reset first, so a simulation may be run repeatedly.
    ///
    /// # Errors
    /// - [`EmsError::InvalidWindow`] if `start >= end` or `warmup < 0`.
    /// - [`EmsError::InvalidConfig`] if the configuration is invalid.
    /// - [`EmsError::UnknownCall`] / [`EmsError::UnknownVehicle`] on a
    ///   bookkeeping inconsistency; the run is aborted.
    pub fn run(&mut self, start_s: f64, end_s: f64, warmup_s: f64) -> Result<SurvivalKpi> {
        let window_ok = start_s.is_finite()
            && end_s.is_finite()
            && start_s < end_s
            && warmup_s.is_finite()
            && warmup_s >= 0.0;
        if !window_ok {
            return Err(EmsError::InvalidWindow {
                start: start_s,
                end: end_s,
                warmup: warmup_s,
            });
        }
        self.config.validate()?;
        self.reset();

        let warm_lo = start_s - warmup_s;
        self.schedule_arrivals(warm_lo, start_s);
        self.drain(start_s, false)?;

        self.schedule_arrivals(start_s, end_s);
        self.drain(end_s, true)?;

        let kpi = SurvivalKpi::calculate(
            self.calls.iter().copied(),
            &self.response_times,
            self.wait_list.len(),
        );
        info!(
            "simulation [{start_s}, {end_s}) finished: objective={:.4}, served={}, waiting={}",
            kpi.objective, kpi.served_calls, kpi.waiting_calls
        );
        Ok(kpi)
    }

    /// Current simulation clock (s).
    pub fn now_s(&self) -> f64 {
        self.now_s
    }

    /// Recorded response times (call id → seconds).
    pub fn response_times(&self) -> &BTreeMap<CallId, f64> {
        &self.response_times
    }

    /// Recorded response time of one call.
    pub fn response_time(&self, call: CallId) -> Option<f64> {
        self.response_times.get(&call).copied()
    }

    /// Vehicles assigned to a call, in assignment order.
    pub fn assignment(&self, call: CallId) -> Option<&[VehicleId]> {
        self.assignments.get(&call).map(Vec::as_slice)
    }

    /// Calls still waiting for vehicles, in FIFO order.
    pub fn wait_list(&self) -> impl Iterator<Item = CallId> + '_ {
        self.wait_list.iter().copied()
    }

    /// Vehicle arena, ordered by id.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Looks up a vehicle by id.
    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicle_index.get(&id).map(|&i| &self.vehicles[i])
    }

    /// Stations of this run.
    pub fn stations(&self) -> &BTreeMap<StationId, Station> {
        &self.stations
    }

    /// Number of events still queued (e.g., past the window end).
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    // ======================== Event loop ========================

    fn reset(&mut self) {
        for (vehicle, &home) in self.vehicles.iter_mut().zip(&self.homes) {
            vehicle.location = home;
            vehicle.status = VehicleStatus::Idle;
            vehicle.route.clear();
            vehicle.leg = 0;
        }
        self.events.clear();
        self.wait_list.clear();
        self.response_times.clear();
        self.assignments.clear();
        self.recording = false;
        self.now_s = 0.0;
    }

    fn schedule_arrivals(&mut self, from_s: f64, until_s: f64) {
        for call in &self.calls {
            if from_s <= call.arrival_s && call.arrival_s < until_s {
                self.events.push(call.arrival_s, EventKind::CallArrival(call.id));
            }
        }
    }

    fn drain(&mut self, until_s: f64, record: bool) -> Result<()> {
        self.recording = record;
        while let Some(time_s) = self.events.peek_time() {
            if time_s >= until_s {
                break;
            }
            let Some(event) = self.events.pop_earliest() else {
                break;
            };
            self.now_s = event.time_s;
            self.handle(event)?;
        }
        self.now_s = until_s;
        Ok(())
    }

    fn handle(&mut self, event: Event) -> Result<()> {
        trace!("t={:.1} #{} {:?}", event.time_s, event.sequence, event.kind);
        match event.kind {
            EventKind::CallArrival(call) => self.on_call_arrival(call),
            EventKind::SceneDeparture(call) => self.on_scene_departure(call),
            EventKind::JobComplete { call, vehicle } => self.on_job_complete(call, vehicle),
            EventKind::LocationUpdate { vehicle, leg } => self.on_location_update(vehicle, leg),
        }
    }

    // ======================== Handlers ========================

    fn on_call_arrival(&mut self, call_id: CallId) -> Result<()> {
        let call = self.call(call_id)?;
        if !self.try_dispatch(call)? {
            debug!(
                "t={:.1} call {} queued (need A={}, R={})",
                self.now_s, call.id, call.need_ambulances, call.need_rapid_response
            );
            self.wait_list.push_back(call.id);
        }
        Ok(())
    }

    fn on_scene_departure(&mut self, call_id: CallId) -> Result<()> {
        let call = self.call(call_id)?;
        let assigned = self
            .assignments
            .get(&call_id)
            .cloned()
            .ok_or(EmsError::UnknownCall(call_id))?;

        // Everyone assigned is on scene now; stale ticks of the inbound leg are dropped.
        for &vid in &assigned {
            self.vehicle_mut(vid)?.location = call.scene;
        }

        let mut transporter = None;
        if call.needs_transport() {
            for &vid in &assigned {
                let v = self.vehicle(vid).ok_or(EmsError::UnknownVehicle(vid))?;
                if v.class.can_transport() {
                    transporter = Some(vid);
                    break;
                }
            }
        }

        if let Some(vid) = transporter {
            let eta = self.travel.travel_time_s(
                call.scene,
                call.hospital,
                self.now_s,
                VehicleClass::Ambulance,
            );
            let done_s = self.now_s + eta + call.hospital_time_s + call.handover_time_s;
            self.vehicle_mut(vid)?.status = VehicleStatus::Transporting(call.id);
            self.begin_travel(vid, call.hospital, self.now_s)?;
            self.events.push(
                done_s,
                EventKind::JobComplete {
                    call: call.id,
                    vehicle: vid,
                },
            );
            debug!("t={:.1} call {} transported by vehicle {vid}", self.now_s, call.id);
        }

        for &vid in assigned.iter().filter(|&&vid| Some(vid) != transporter) {
            self.release(vid)?;
        }

        self.serve_wait_list()
    }

    fn on_job_complete(&mut self, call_id: CallId, vehicle: VehicleId) -> Result<()> {
        let call = self.call(call_id)?;
        self.vehicle_mut(vehicle)?.location = call.hospital;
        self.release(vehicle)?;
        self.serve_wait_list()
    }

    fn on_location_update(&mut self, vehicle: VehicleId, leg: u64) -> Result<()> {
        let period = self.config.location_update_period_s;
        let now = self.now_s;
        let v = self.vehicle_mut(vehicle)?;
        if v.leg != leg {
            return Ok(());
        }

        v.route.pop_front();
        if let Some(&next) = v.route.front() {
            v.location = next;
        }

        let en_route = v.is_travelling();
        if !en_route {
            v.route.clear();
            if v.status == VehicleStatus::Returning {
                v.status = VehicleStatus::Idle;
            }
        }

        if en_route {
            self.events
                .push(now + period, EventKind::LocationUpdate { vehicle, leg });
        }
        Ok(())
    }

    // ======================== Helpers ========================

    /// Attempts to dispatch `call`; on success commits the assignment.
    fn try_dispatch(&mut self, call: &'a Call) -> Result<bool> {
        let travel = self.travel;
        let context = DispatchContext::new(self.now_s, travel);
        let Some(assigned) = self.policy.dispatch(call, &self.vehicles, &context) else {
            return Ok(false);
        };
        if assigned.is_empty() {
            return Err(EmsError::EmptyAssignment(call.id));
        }

        // First arrival; ties go to the earlier vehicle in assignment order.
        let now = self.now_s;
        let mut first_eta = f64::INFINITY;
        for &vid in &assigned {
            let v = self.vehicle(vid).ok_or(EmsError::UnknownVehicle(vid))?;
            let eta = travel.travel_time_s(v.location, call.scene, now, v.class);
            if eta < first_eta {
                first_eta = eta;
            }
        }

        let depart_s = now + call.dispatch_delay_s;
        let first_arrival_s = depart_s + first_eta;
        if self.recording {
            self.response_times
                .insert(call.id, first_arrival_s - call.arrival_s);
        }
        self.events.push(
            first_arrival_s + call.scene_time_s,
            EventKind::SceneDeparture(call.id),
        );

        for &vid in &assigned {
            self.vehicle_mut(vid)?.status = VehicleStatus::Responding(call.id);
            self.begin_travel(vid, call.scene, depart_s)?;
        }
        debug!(
            "t={:.1} call {} dispatched to {:?}, first arrival at {:.1}",
            self.now_s, call.id, assigned, first_arrival_s
        );
        self.assignments.insert(call.id, assigned);
        Ok(true)
    }

    /// Retries waiting calls in FIFO order; unserved calls keep their position.
    fn serve_wait_list(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.wait_list);
        for call_id in pending {
            let call = self.call(call_id)?;
            if !self.try_dispatch(call)? {
                self.wait_list.push_back(call_id);
            }
        }
        Ok(())
    }

    /// Frees a vehicle and sends it home.
    fn release(&mut self, vehicle: VehicleId) -> Result<()> {
        let idx = self.index_of(vehicle)?;
        let home = self.homes[idx];
        self.vehicles[idx].status = VehicleStatus::Returning;
        self.begin_travel(vehicle, home, self.now_s)
    }

    /// Starts a new travel leg and schedules its first location update.
    fn begin_travel(&mut self, vehicle: VehicleId, dest: GridCell, depart_s: f64) -> Result<()> {
        let travel = self.travel;
        let period = self.config.location_update_period_s;
        let first_tick_s = self.now_s.max(depart_s) + period;

        let v = self.vehicle_mut(vehicle)?;
        v.leg += 1;
        v.route = travel.route(v.location, dest).into();

        if !v.is_travelling() {
            v.route.clear();
            v.location = dest;
            if v.status == VehicleStatus::Returning {
                v.status = VehicleStatus::Idle;
            }
            return Ok(());
        }

        let leg = v.leg;
        self.events
            .push(first_tick_s, EventKind::LocationUpdate { vehicle, leg });
        Ok(())
    }

    fn call(&self, id: CallId) -> Result<&'a Call> {
        self.call_index
            .get(&id)
            .map(|&i| self.calls[i])
            .ok_or(EmsError::UnknownCall(id))
    }

    fn index_of(&self, id: VehicleId) -> Result<usize> {
        self.vehicle_index
            .get(&id)
            .copied()
            .ok_or(EmsError::UnknownVehicle(id))
    }

    fn vehicle_mut(&mut self, id: VehicleId) -> Result<&mut Vehicle> {
        let idx = self.index_of(id)?;
        Ok(&mut self.vehicles[idx])
    }
}

/// Builds a simulation, runs it, and returns the KPIs.
///
/// Convenience entry point using the default policy and configuration.
pub fn simulate(
    calls: &[Call],
    stations: BTreeMap<StationId, Station>,
    vehicles: Vec<Vehicle>,
    travel: &dyn TravelModel,
    start_s: f64,
    end_s: f64,
    warmup_s: f64,
) -> Result<SurvivalKpi> {
    Simulation::new(calls, stations, vehicles, travel)?.run(start_s, end_s, warmup_s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatientCategory;
    use crate::travel::LatticeTravelModel;

    // 2 km cells at 60 km/h: 120 s per straight step.
    fn travel() -> LatticeTravelModel {
        LatticeTravelModel::new(26, 22, 2.0).with_default_speed(60.0)
    }

    fn one_station() -> BTreeMap<StationId, Station> {
        [(0, Station::new(0, (10, 10)))].into_iter().collect()
    }

    fn call(id: CallId, arrival_s: f64, row: i32, col: i32) -> Call {
        Call::new(id, arrival_s, GridCell::new(row, col), GridCell::new(10, 16))
            .with_dispatch_delay(30.0)
            .with_scene_time(600.0)
            .with_category(PatientCategory::CategoryA)
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("response time recorded");
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_single_call_response_time() {
        let travel = travel();
        let calls = vec![call(1, 0.0, 10, 12)];
        let vehicles = vec![Vehicle::ambulance(0, 0, GridCell::new(10, 10))];

        let mut sim = Simulation::new(&calls, one_station(), vehicles, &travel).unwrap();
        let kpi = sim.run(0.0, 3600.0, 0.0).unwrap();

        // 30 s dispatch delay + 240 s travel
        assert_close(sim.response_time(1), 270.0);
        assert_eq!(sim.assignment(1), Some(&[0][..]));
        assert_eq!(kpi.category_a_calls, 1);
        assert_eq!(kpi.objective, 1.0);
    }

    #[test]
    fn test_second_call_waits_for_scene_departure() {
        let travel = travel();
        let calls = vec![call(1, 0.0, 10, 12), call(2, 100.0, 10, 11)];
        let vehicles = vec![Vehicle::ambulance(0, 0, GridCell::new(10, 10))];

        let mut sim = Simulation::new(&calls, one_station(), vehicles, &travel).unwrap();
        sim.run(0.0, 10_000.0, 0.0).unwrap();

        assert_close(sim.response_time(1), 270.0);
        // Freed at scene departure (270 + 600 = 870) at (10,12), one cell
        // from the second scene: 870 + 30 + 120 - 100
        assert_close(sim.response_time(2), 920.0);
        assert_eq!(sim.assignment(2), Some(&[0][..]));
        assert_eq!(sim.wait_list().count(), 0);
    }

    #[test]
    fn test_transport_holds_ambulance_until_job_complete() {
        let travel = travel();
        let calls = vec![
            call(1, 0.0, 10, 12)
                .with_hospital_time(900.0)
                .with_handover_time(300.0),
            call(2, 100.0, 10, 11),
        ];
        let vehicles = vec![Vehicle::ambulance(0, 0, GridCell::new(10, 10))];

        let mut sim = Simulation::new(&calls, one_station(), vehicles, &travel).unwrap();
        sim.run(0.0, 10_000.0, 0.0).unwrap();

        // Scene departure 870, hospital 4 cells away (480 s), then 900 + 300:
        // job complete at 2550 at (10,16); second scene is 5 cells away.
        assert_close(sim.response_time(2), 2550.0 + 30.0 + 600.0 - 100.0);
    }

    #[test]
    fn test_rapid_response_released_at_scene_departure() {
        let travel = travel();
        let calls = vec![call(1, 0.0, 10, 12)
            .with_need(1, 1)
            .with_hospital_time(900.0)];
        let vehicles = vec![
            Vehicle::ambulance(0, 0, GridCell::new(10, 10)),
            Vehicle::rapid_response(1, 0, GridCell::new(10, 10)),
        ];

        let mut sim = Simulation::new(&calls, one_station(), vehicles, &travel).unwrap();
        // Window ends after scene departure (870) but before job complete
        sim.run(0.0, 1000.0, 0.0).unwrap();

        let ambulance = sim.vehicle(0).unwrap();
        let rrv = sim.vehicle(1).unwrap();
        assert_eq!(ambulance.status, VehicleStatus::Transporting(1));
        assert!(ambulance.is_busy());
        assert_eq!(rrv.status, VehicleStatus::Returning);
        assert!(!rrv.is_busy());
        // One tick (990) into the return leg
        assert_eq!(rrv.location, GridCell::new(10, 11));
        assert!(sim.pending_events() > 0);
    }

    #[test]
    fn test_insufficient_fleet_queues_whole_call() {
        let travel = travel();
        let calls = vec![call(1, 0.0, 10, 12).with_need(2, 0)];
        let vehicles = vec![Vehicle::ambulance(0, 0, GridCell::new(10, 10))];

        let mut sim = Simulation::new(&calls, one_station(), vehicles, &travel).unwrap();
        let kpi = sim.run(0.0, 3600.0, 0.0).unwrap();

        assert_eq!(sim.wait_list().collect::<Vec<_>>(), vec![1]);
        assert_eq!(sim.assignment(1), None);
        assert_eq!(sim.response_time(1), None);
        assert!(!sim.vehicle(0).unwrap().is_busy());
        assert_eq!(kpi.waiting_calls, 1);
        assert_eq!(kpi.served_calls, 0);
        assert_eq!(kpi.objective, 0.0);
    }

    #[test]
    fn test_wait_list_keeps_fifo_position() {
        let travel = travel();
        let calls = vec![
            call(1, 0.0, 10, 12),
            call(2, 10.0, 10, 12).with_need(2, 0),
            call(3, 20.0, 10, 11),
        ];
        let vehicles = vec![Vehicle::ambulance(0, 0, GridCell::new(10, 10))];

        let mut sim = Simulation::new(&calls, one_station(), vehicles, &travel).unwrap();
        sim.run(0.0, 10_000.0, 0.0).unwrap();

        // Call 2 can never be served; call 3 is served behind it
        assert_eq!(sim.wait_list().collect::<Vec<_>>(), vec![2]);
        assert!(sim.response_time(3).is_some());
    }

    #[test]
    fn test_warmup_and_window_bounds() {
        let travel = travel();
        let calls = vec![
            call(1, 400.0, 10, 12),  // before warm-up: never simulated
            call(2, 600.0, 10, 12),  // warm-up: simulated, not recorded
            call(3, 1000.0, 10, 12), // measured
            call(4, 5000.0, 10, 12), // at window end: excluded
        ];
        let vehicles = vec![
            Vehicle::ambulance(0, 0, GridCell::new(10, 10)),
            Vehicle::ambulance(1, 0, GridCell::new(10, 10)),
        ];

        let mut sim = Simulation::new(&calls, one_station(), vehicles, &travel).unwrap();
        let kpi = sim.run(1000.0, 5000.0, 500.0).unwrap();

        assert_eq!(sim.assignment(1), None);
        assert!(sim.assignment(2).is_some());
        assert_eq!(sim.response_time(2), None);
        // Vehicle 0 is still busy with call 2, so call 3 gets vehicle 1
        assert_eq!(sim.assignment(3), Some(&[1][..]));
        assert_close(sim.response_time(3), 270.0);
        assert_eq!(sim.assignment(4), None);
        assert_eq!(sim.wait_list().count(), 0);
        assert_eq!(kpi.served_calls, 1);
    }

    #[test]
    fn test_returning_vehicle_becomes_idle_at_base() {
        let travel = travel();
        let calls = vec![Call::new(1, 0.0, GridCell::new(10, 11), GridCell::new(0, 0))];
        let vehicles = vec![Vehicle::ambulance(0, 0, GridCell::new(10, 10))];

        let mut sim = Simulation::new(&calls, one_station(), vehicles, &travel).unwrap();
        sim.run(0.0, 1000.0, 0.0).unwrap();

        let v = sim.vehicle(0).unwrap();
        assert_eq!(v.status, VehicleStatus::Idle);
        assert_eq!(v.location, GridCell::new(10, 10));
        assert!(v.route.is_empty());
    }

    #[test]
    fn test_response_times_non_negative_and_repeatable() {
        let travel = travel();
        let calls: Vec<Call> = (0..12)
            .map(|i| call(i, i as f64 * 180.0, 8 + (i as i32 % 5), 9 + (i as i32 % 4)))
            .collect();
        let stations: BTreeMap<StationId, Station> =
            [Station::new(0, (10, 10)), Station::new(1, (5, 5))]
                .into_iter()
                .map(|s| (s.id, s))
                .collect();
        let vehicles = vec![
            Vehicle::ambulance(0, 0, GridCell::new(10, 10)),
            Vehicle::ambulance(1, 1, GridCell::new(5, 5)),
            Vehicle::rapid_response(2, 1, GridCell::new(5, 5)),
        ];

        let mut sim = Simulation::new(&calls, stations, vehicles, &travel).unwrap();
        let first = sim.run(0.0, 7200.0, 0.0).unwrap();
        let first_times = sim.response_times().clone();
        let second = sim.run(0.0, 7200.0, 0.0).unwrap();

        assert!(first_times.values().all(|&rt| rt >= 0.0));
        assert_eq!(&first_times, sim.response_times());
        assert_eq!(first, second);
        assert!((0.0..=1.0).contains(&first.objective));
    }

    #[test]
    fn test_invalid_window() {
        let travel = travel();
        let calls = vec![call(1, 0.0, 10, 12)];
        let vehicles = vec![Vehicle::ambulance(0, 0, GridCell::new(10, 10))];

        let mut sim = Simulation::new(&calls, one_station(), vehicles, &travel).unwrap();
        assert!(matches!(
            sim.run(100.0, 100.0, 0.0),
            Err(EmsError::InvalidWindow { .. })
        ));
        assert!(matches!(
            sim.run(0.0, 100.0, -1.0),
            Err(EmsError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_invalid_input_rejected() {
        let travel = travel();
        let calls = vec![call(1, 0.0, 10, 12)];
        let vehicles = vec![Vehicle::ambulance(0, 3, GridCell::new(10, 10))];

        assert!(matches!(
            Simulation::new(&calls, one_station(), vehicles, &travel),
            Err(EmsError::Validation(_))
        ));
    }

    /// Always answers with the same vehicle list.
    #[derive(Debug)]
    struct FixedPolicy(Vec<VehicleId>);

    impl DispatchPolicy for FixedPolicy {
        fn name(&self) -> &'static str {
            "FIXED"
        }

        fn dispatch(
            &self,
            _call: &Call,
            _vehicles: &[Vehicle],
            _context: &DispatchContext<'_>,
        ) -> Option<Vec<VehicleId>> {
            Some(self.0.clone())
        }
    }

    #[test]
    fn test_unknown_vehicle_is_fatal() {
        let travel = travel();
        let calls = vec![call(1, 0.0, 10, 12)];
        let vehicles = vec![Vehicle::ambulance(0, 0, GridCell::new(10, 10))];
        let policy = FixedPolicy(vec![999]);

        let mut sim = Simulation::new(&calls, one_station(), vehicles, &travel)
            .unwrap()
            .with_policy(&policy);
        assert!(matches!(
            sim.run(0.0, 3600.0, 0.0),
            Err(EmsError::UnknownVehicle(999))
        ));
    }

    #[test]
    fn test_empty_assignment_is_fatal() {
        let travel = travel();
        let calls = vec![call(1, 0.0, 10, 12)];
        let vehicles = vec![Vehicle::ambulance(0, 0, GridCell::new(10, 10))];
        let policy = FixedPolicy(vec![]);

        let mut sim = Simulation::new(&calls, one_station(), vehicles, &travel)
            .unwrap()
            .with_policy(&policy);
        assert!(matches!(
            sim.run(0.0, 3600.0, 0.0),
            Err(EmsError::EmptyAssignment(1))
        ));
        assert!(sim.response_times().is_empty());
    }

    #[test]
    fn test_unknown_call_is_fatal() {
        let travel = travel();
        let calls = vec![call(1, 0.0, 10, 12)];
        let vehicles = vec![Vehicle::ambulance(0, 0, GridCell::new(10, 10))];

        let mut sim = Simulation::new(&calls, one_station(), vehicles, &travel).unwrap();
        assert!(matches!(
            sim.on_call_arrival(42),
            Err(EmsError::UnknownCall(42))
        ));
        // Scene departure for a call that was never dispatched.
        assert!(matches!(
            sim.on_scene_departure(1),
            Err(EmsError::UnknownCall(1))
        ));
    }

    #[test]
    fn test_run_starts_vehicles_at_home() {
        let travel = travel();
        let calls = vec![call(1, 0.0, 10, 12)];
        let vehicles = vec![Vehicle::ambulance(0, 0, GridCell::new(2, 2))];

        let mut sim = Simulation::new(&calls, one_station(), vehicles, &travel).unwrap();
        sim.run(0.0, 100.0, 0.0).unwrap();
        // Dispatched from (10, 10), not from the given (2, 2).
        assert!((sim.response_time(1).unwrap() - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_simulate_entry_point() {
        let travel = travel();
        let calls = vec![call(1, 0.0, 10, 12).with_category(PatientCategory::Cardiac)];
        let vehicles = vec![Vehicle::ambulance(0, 0, GridCell::new(10, 10))];

        let kpi = simulate(&calls, one_station(), vehicles, &travel, 0.0, 3600.0, 0.0).unwrap();
        assert_eq!(kpi.cardiac_calls, 1);
        assert!((kpi.objective - crate::sim::cardiac_survival(270.0)).abs() < 1e-9);
    }
}
