//! Accelerator execution boundary.
//!
//! Vendor runtimes (device discovery, binary loading, buffer migration,
//! teardown) are external collaborators; the engine only depends on the
//! narrow contract captured here: a pool of compute units, each able to run
//! one pricing request at a time through an explicit three-step round trip.
//!
//! Per unit the sequencing is strict: `load` (host to device transfer) must
//! complete before `execute` starts, and `execute` before `retrieve`
//! (device to host). A unit's input and output storage is one request deep,
//! so the harness must drain a round trip before staging the unit's next
//! request, the classic read-after-write hazard on reused buffers. Across
//! different units no ordering is required at all.
//!
//! [`EmulatedUnit`] implements the contract in-process on top of the
//! lattice kernel and enforces the protocol, standing in for real devices
//! in tests and emulation runs.

use bopm_core::lattice;
use bopm_core::types::OptionRequest;
use thiserror::Error;

/// Errors from the accelerator boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccelError {
    /// Every topology count must be positive.
    #[error("device topology counts must be positive")]
    InvalidTopology,

    /// A pool needs at least one compute unit.
    #[error("no compute units configured")]
    NoUnits,

    /// `load` was called while a prior request was still in flight.
    #[error("input register busy: previous request not yet retrieved")]
    Busy,

    /// `execute` was called with no request staged.
    #[error("no request staged for execution")]
    NothingStaged,

    /// `retrieve` was called before `execute` completed.
    #[error("no result pending retrieval")]
    NothingPending,
}

/// One hardware-resident pricing engine.
///
/// Implementations wrap whatever the vendor runtime calls a kernel or
/// compute unit. The three methods mirror the per-request data path:
/// stage the input, trigger execution, drain the result.
pub trait ComputeUnit {
    /// Stages a request into the unit's input storage.
    fn load(&mut self, request: &OptionRequest) -> Result<(), AccelError>;

    /// Runs the staged request to completion.
    fn execute(&mut self) -> Result<(), AccelError>;

    /// Drains the result, freeing the unit for the next request.
    fn retrieve(&mut self) -> Result<f32, AccelError>;
}

/// Factorised parallel capacity of an accelerator card.
///
/// The lane count (kernels x compute units per kernel x parallel functions
/// per compute unit) is the effective worker count used to round batch
/// sizes, mirroring how the thread count rounds them on the software path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceTopology {
    /// Independent kernel instances addressable from the host.
    pub kernels: usize,
    /// Compute units instantiated per kernel.
    pub compute_units_per_kernel: usize,
    /// Pricing functions running in parallel inside one compute unit.
    pub parallel_functions_per_cu: usize,
}

impl DeviceTopology {
    /// Creates a topology description.
    pub fn new(
        kernels: usize,
        compute_units_per_kernel: usize,
        parallel_functions_per_cu: usize,
    ) -> Self {
        Self {
            kernels,
            compute_units_per_kernel,
            parallel_functions_per_cu,
        }
    }

    /// Effective worker count used for batch rounding.
    #[inline]
    pub fn lanes(&self) -> usize {
        self.kernels * self.compute_units_per_kernel * self.parallel_functions_per_cu
    }

    /// Validates that every count is positive.
    pub fn validate(&self) -> Result<(), AccelError> {
        if self.kernels == 0
            || self.compute_units_per_kernel == 0
            || self.parallel_functions_per_cu == 0
        {
            return Err(AccelError::InvalidTopology);
        }
        Ok(())
    }
}

/// Host-side harness over a pool of compute units.
///
/// [`submit`](AcceleratorPool::submit) drives the whole batch: requests go
/// to units round-robin, and each request's load / execute / retrieve round
/// trip completes before the same unit's storage is reused. Submission is
/// deliberately synchronous per unit: the simplest correct host loop, at
/// the cost of leaving a unit idle between retrieve and the next load.
/// Overlapping transfers with execution per unit is a valid faster design,
/// not a correctness requirement.
pub struct AcceleratorPool<U> {
    units: Vec<U>,
}

impl<U: ComputeUnit> AcceleratorPool<U> {
    /// Wraps a set of compute units.
    ///
    /// # Errors
    ///
    /// Fails with [`AccelError::NoUnits`] on an empty pool.
    pub fn new(units: Vec<U>) -> Result<Self, AccelError> {
        if units.is_empty() {
            return Err(AccelError::NoUnits);
        }
        Ok(Self { units })
    }

    /// Number of compute units in the pool.
    #[inline]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Runs every request and gathers results in input order.
    ///
    /// Semantically synchronous: when this returns, every submitted request
    /// has completed and every result slot is written.
    ///
    /// # Errors
    ///
    /// Propagates the first unit failure; the batch is abandoned at that
    /// point, matching the no-retry policy of the harness.
    pub fn submit(&mut self, requests: &[OptionRequest]) -> Result<Vec<f32>, AccelError> {
        let mut results = Vec::with_capacity(requests.len());
        let unit_count = self.units.len();

        for (index, request) in requests.iter().enumerate() {
            let unit = &mut self.units[index % unit_count];
            unit.load(request)?;
            unit.execute()?;
            results.push(unit.retrieve()?);
        }

        Ok(results)
    }
}

/// Builds a pool of emulated units, one per kernel slot in the topology.
///
/// # Errors
///
/// Fails if the topology has any zero count.
pub fn emulated_pool(topology: DeviceTopology) -> Result<AcceleratorPool<EmulatedUnit>, AccelError> {
    topology.validate()?;
    let units = (0..topology.kernels).map(|_| EmulatedUnit::new()).collect();
    AcceleratorPool::new(units)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UnitState {
    Idle,
    Loaded,
    Executed,
}

/// In-process compute unit backed by the lattice kernel.
///
/// Holds a one-deep input register and a one-deep output register, and
/// refuses out-of-order protocol steps the same way a real unit's command
/// queue would surface a sequencing bug.
pub struct EmulatedUnit {
    state: UnitState,
    input: OptionRequest,
    output: f32,
    scratch: Vec<f32>,
}

impl EmulatedUnit {
    /// Creates an idle unit.
    pub fn new() -> Self {
        Self {
            state: UnitState::Idle,
            input: OptionRequest::padding(),
            output: 0.0,
            scratch: Vec::new(),
        }
    }
}

impl Default for EmulatedUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeUnit for EmulatedUnit {
    fn load(&mut self, request: &OptionRequest) -> Result<(), AccelError> {
        if self.state != UnitState::Idle {
            return Err(AccelError::Busy);
        }
        self.input = *request;
        self.state = UnitState::Loaded;
        Ok(())
    }

    fn execute(&mut self) -> Result<(), AccelError> {
        if self.state != UnitState::Loaded {
            return Err(AccelError::NothingStaged);
        }
        self.output = lattice::price_with_scratch(&self.input, &mut self.scratch);
        self.state = UnitState::Executed;
        Ok(())
    }

    fn retrieve(&mut self) -> Result<f32, AccelError> {
        if self.state != UnitState::Executed {
            return Err(AccelError::NothingPending);
        }
        self.state = UnitState::Idle;
        Ok(self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bopm_core::lattice;

    fn sample_request(strike: f32) -> OptionRequest {
        OptionRequest::new(1, 100.0, strike, 0.05, 0.3, 0.01, 300)
    }

    #[test]
    fn test_topology_lanes() {
        let topology = DeviceTopology::new(3, 4, 2);
        assert_eq!(topology.lanes(), 24);
        assert!(topology.validate().is_ok());
    }

    #[test]
    fn test_topology_zero_count_rejected() {
        assert_eq!(
            DeviceTopology::new(1, 0, 2).validate(),
            Err(AccelError::InvalidTopology)
        );
    }

    #[test]
    fn test_unit_round_trip() {
        let mut unit = EmulatedUnit::new();
        let request = sample_request(110.0);

        unit.load(&request).unwrap();
        unit.execute().unwrap();
        let result = unit.retrieve().unwrap();

        assert_eq!(result, lattice::price(&request));
    }

    #[test]
    fn test_unit_rejects_execute_before_load() {
        let mut unit = EmulatedUnit::new();
        assert_eq!(unit.execute(), Err(AccelError::NothingStaged));
    }

    #[test]
    fn test_unit_rejects_retrieve_before_execute() {
        let mut unit = EmulatedUnit::new();
        unit.load(&sample_request(100.0)).unwrap();
        assert_eq!(unit.retrieve(), Err(AccelError::NothingPending));
    }

    #[test]
    fn test_unit_rejects_double_load() {
        // The input register is one request deep: staging over an
        // un-drained request is the read-after-write hazard.
        let mut unit = EmulatedUnit::new();
        unit.load(&sample_request(100.0)).unwrap();
        assert_eq!(unit.load(&sample_request(105.0)), Err(AccelError::Busy));
    }

    #[test]
    fn test_unit_reusable_after_retrieve() {
        let mut unit = EmulatedUnit::new();

        unit.load(&sample_request(100.0)).unwrap();
        unit.execute().unwrap();
        unit.retrieve().unwrap();

        unit.load(&sample_request(105.0)).unwrap();
        unit.execute().unwrap();
        assert_eq!(
            unit.retrieve().unwrap(),
            lattice::price(&sample_request(105.0))
        );
    }

    #[test]
    fn test_empty_pool_rejected() {
        assert!(matches!(
            AcceleratorPool::<EmulatedUnit>::new(Vec::new()),
            Err(AccelError::NoUnits)
        ));
    }

    #[test]
    fn test_pool_matches_direct_pricing() {
        let requests: Vec<OptionRequest> =
            (0..8).map(|k| sample_request(90.0 + 5.0 * k as f32)).collect();

        let mut pool = emulated_pool(DeviceTopology::new(3, 1, 1)).unwrap();
        let results = pool.submit(&requests).unwrap();

        let direct: Vec<f32> = requests.iter().map(lattice::price).collect();
        assert_eq!(results, direct);
    }

    #[test]
    fn test_pool_preserves_order_across_units() {
        // More units than requests and a non-divisible count: results must
        // still line up index for index.
        let requests: Vec<OptionRequest> =
            (0..5).map(|k| sample_request(80.0 + 10.0 * k as f32)).collect();

        let mut pool = emulated_pool(DeviceTopology::new(4, 2, 2)).unwrap();
        let results = pool.submit(&requests).unwrap();

        for (request, result) in requests.iter().zip(&results) {
            assert_eq!(*result, lattice::price(request));
        }
    }

    #[test]
    fn test_emulated_pool_size_follows_kernel_count() {
        let pool = emulated_pool(DeviceTopology::new(4, 2, 2)).unwrap();
        assert_eq!(pool.unit_count(), 4);
    }

    #[test]
    fn test_emulated_pool_invalid_topology() {
        assert!(matches!(
            emulated_pool(DeviceTopology::new(0, 1, 1)),
            Err(AccelError::InvalidTopology)
        ));
    }
}
