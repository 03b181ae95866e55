//! # TwinBlast Python Bindings
//!
//! PyO3 bindings exposing a TwinBlast game session to Python.
//!
//! ## Usage
//!
//! ```python
//! import twinblast
//!
//! twinblast.init_logging("info")
//!
//! session = twinblast.PySession()
//! player = session.spawn_player(location=(0, 0, 0), yaw=0.0)
//! session.spawn_target_sphere(center=(500, 0, 0), radius=50)
//!
//! session.fire(player)
//! for _ in range(60):
//!     for actor, outcome in session.step(1 / 60):
//!         print(actor, outcome.hit, outcome.point)
//!
//! # Debug lines as a flat float32 array: [sx, sy, sz, ex, ey, ez, ...]
//! lines = session.debug_lines()
//! ```

use glam::{Vec2, Vec3};
use hitscan::ActorId;
use numpy::{PyArray1, ToPyArray};
use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use twinblast_core::input::InputEvent;
use twinblast_core::scenario::{run_scenario, Scenario};
use twinblast_core::session::GameSession;
use twinblast_core::{HitOutcome, SessionError};

fn vec3(v: (f32, f32, f32)) -> Vec3 {
    Vec3::new(v.0, v.1, v.2)
}

fn tuple3(v: Vec3) -> (f32, f32, f32) {
    (v.x, v.y, v.z)
}

fn session_err(err: SessionError) -> PyErr {
    match err {
        SessionError::UnknownActor(_) => PyKeyError::new_err(err.to_string()),
        SessionError::NotACharacter(_) => PyTypeError::new_err(err.to_string()),
        SessionError::World(_) | SessionError::Config(_) => PyValueError::new_err(err.to_string()),
    }
}

/// Actor identifier exposed to Python.
#[pyclass(frozen, eq, hash)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PyActorId(ActorId);

#[pymethods]
impl PyActorId {
    /// Get the raw u64 value.
    #[getter]
    fn value(&self) -> u64 {
        self.0.as_u64()
    }

    fn __repr__(&self) -> String {
        format!("ActorId({})", self.0.as_u64())
    }
}

impl From<ActorId> for PyActorId {
    fn from(id: ActorId) -> Self {
        Self(id)
    }
}

impl From<PyActorId> for ActorId {
    fn from(id: PyActorId) -> Self {
        id.0
    }
}

/// Result of one resolved attack.
#[pyclass(frozen)]
#[derive(Clone)]
pub struct PyHitOutcome {
    /// Whether the trace was blocked.
    #[pyo3(get)]
    pub hit: bool,
    /// Impact point on a hit, trace end on a miss.
    #[pyo3(get)]
    pub point: Option<(f32, f32, f32)>,
    /// Actor that was hit.
    #[pyo3(get)]
    pub target: Option<PyActorId>,
}

#[pymethods]
impl PyHitOutcome {
    fn __repr__(&self) -> String {
        format!(
            "HitOutcome(hit={}, point={:?}, target={:?})",
            self.hit,
            self.point,
            self.target.map(|t| t.0.as_u64())
        )
    }
}

impl From<HitOutcome> for PyHitOutcome {
    fn from(outcome: HitOutcome) -> Self {
        Self {
            hit: outcome.hit,
            point: outcome.point.map(tuple3),
            target: outcome.target.map(PyActorId::from),
        }
    }
}

/// Game session wrapper for Python.
#[pyclass(unsendable)]
pub struct PySession {
    inner: GameSession,
}

impl PySession {
    fn dispatch(&mut self, actor: PyActorId, event: &InputEvent) -> PyResult<()> {
        self.inner
            .dispatch_input(actor.into(), event)
            .map(|_| ())
            .map_err(session_err)
    }
}

#[pymethods]
impl PySession {
    /// Create a session with the default assets and game mode.
    #[new]
    fn new() -> Self {
        Self {
            inner: GameSession::new(),
        }
    }

    /// Simulated time in seconds.
    #[getter]
    fn time(&self) -> f64 {
        self.inner.time()
    }

    /// Spawn the default player pawn.
    #[pyo3(signature = (location=(0.0, 0.0, 0.0), yaw=0.0))]
    fn spawn_player(&mut self, location: (f32, f32, f32), yaw: f32) -> PyResult<PyActorId> {
        self.inner
            .spawn_player(vec3(location), yaw)
            .map(PyActorId::from)
            .map_err(session_err)
    }

    /// Spawn a static sphere target.
    fn spawn_target_sphere(&mut self, center: (f32, f32, f32), radius: f32) -> PyResult<PyActorId> {
        self.inner
            .spawn_target_sphere(vec3(center), radius)
            .map(PyActorId::from)
            .map_err(session_err)
    }

    /// Spawn a static axis-aligned box target.
    fn spawn_target_box(
        &mut self,
        min: (f32, f32, f32),
        max: (f32, f32, f32),
    ) -> PyResult<PyActorId> {
        self.inner
            .spawn_target_box(vec3(min), vec3(max))
            .map(PyActorId::from)
            .map_err(session_err)
    }

    /// Remove an actor.
    fn despawn(&mut self, actor: PyActorId) -> PyResult<()> {
        self.inner.despawn(actor.into()).map_err(session_err)
    }

    /// Movement input for one frame: `x` right, `y` forward.
    fn move_input(&mut self, actor: PyActorId, x: f32, y: f32) -> PyResult<()> {
        self.dispatch(actor, &InputEvent::move_axis(Vec2::new(x, y)))
    }

    /// Look input: `x` yaw degrees, `y` pitch degrees.
    fn look(&mut self, actor: PyActorId, x: f32, y: f32) -> PyResult<()> {
        self.dispatch(actor, &InputEvent::look(Vec2::new(x, y)))
    }

    /// Press fire.
    fn fire(&mut self, actor: PyActorId) -> PyResult<()> {
        self.dispatch(actor, &InputEvent::fire_started())
    }

    /// Release fire.
    fn stop_fire(&mut self, actor: PyActorId) -> PyResult<()> {
        self.dispatch(actor, &InputEvent::fire_completed())
    }

    /// Press jump.
    fn jump(&mut self, actor: PyActorId) -> PyResult<()> {
        self.dispatch(actor, &InputEvent::jump_started())
    }

    /// Release jump.
    fn stop_jumping(&mut self, actor: PyActorId) -> PyResult<()> {
        self.dispatch(actor, &InputEvent::jump_completed())
    }

    /// Cut an attack animation short. It resolves on the next step.
    fn interrupt_attack(&mut self, actor: PyActorId) -> PyResult<()> {
        self.inner
            .interrupt_attack(actor.into())
            .map_err(session_err)
    }

    /// Whether a character has an attack in flight.
    fn is_armed(&self, actor: PyActorId) -> PyResult<bool> {
        self.inner
            .try_character(actor.into())
            .map(|c| c.resolver().is_armed())
            .map_err(session_err)
    }

    /// Location of a character.
    fn location(&self, actor: PyActorId) -> PyResult<(f32, f32, f32)> {
        self.inner
            .try_character(actor.into())
            .map(|c| tuple3(c.location()))
            .map_err(session_err)
    }

    /// Advance by `dt` seconds, returning `(actor, outcome)` pairs.
    ///
    /// Releases the GIL during computation for better Python threading.
    fn step(&mut self, py: Python, dt: f32) -> Vec<(PyActorId, PyHitOutcome)> {
        let resolved = py.allow_threads(|| self.inner.step(dt));
        resolved
            .into_iter()
            .map(|(actor, outcome)| (actor.into(), outcome.into()))
            .collect()
    }

    /// Debug lines drawn so far as a flat array.
    ///
    /// Shape: `(num_lines * 6,)`, each line `[sx, sy, sz, ex, ey, ez]`.
    fn debug_lines<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f32>> {
        let flat: Vec<f32> = self
            .inner
            .debug_draw()
            .lines()
            .iter()
            .flat_map(|l| [l.start.x, l.start.y, l.start.z, l.end.x, l.end.y, l.end.z])
            .collect();
        flat.to_pyarray(py)
    }

    /// Presentation log lines recorded so far.
    fn log(&self) -> Vec<String> {
        self.inner.debug_draw().log().to_vec()
    }

    /// Forget recorded debug lines and log.
    fn clear_debug(&mut self) {
        self.inner.debug_draw_mut().clear();
    }
}

/// Run a JSON scenario and return its report as JSON.
#[pyfunction]
fn run_scenario_json(py: Python, scenario: &str) -> PyResult<String> {
    let scenario =
        Scenario::from_json_str(scenario).map_err(|e| PyValueError::new_err(e.to_string()))?;
    let report = py
        .allow_threads(|| run_scenario(&scenario))
        .map_err(session_err)?;
    serde_json::to_string(&report).map_err(|e| PyRuntimeError::new_err(e.to_string()))
}

/// Route `tracing` output to stderr at `level` (overridden by `RUST_LOG`).
///
/// Calling it more than once is harmless; only the first call installs.
#[pyfunction]
#[pyo3(signature = (level="info"))]
fn init_logging(level: &str) -> PyResult<()> {
    let level: tracing::Level = level
        .parse()
        .map_err(|_| PyValueError::new_err(format!("unknown log level: {level}")))?;
    let env_filter =
        tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());
    // Already installed is fine
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
    Ok(())
}

/// Python module definition.
#[pymodule]
fn _twinblast(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySession>()?;
    m.add_class::<PyHitOutcome>()?;
    m.add_class::<PyActorId>()?;
    m.add_function(wrap_pyfunction!(run_scenario_json, m)?)?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    m.add("ATTACK_RANGE", twinblast_core::ATTACK_RANGE)?;
    Ok(())
}
