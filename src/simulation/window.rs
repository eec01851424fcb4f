//! Perihelion window
//!
//! Decides, tick by tick, whether the body is close enough to perihelion for
//! its state to be reported, counts orbits and says when a run is done.
//!
//! The body starts exactly at perihelion. For the first `view` ticks the
//! window is open unconditionally and the largest |true anomaly| seen becomes
//! the window half-angle. After that a tick is inside when
//! `|true anomaly| < half-angle`. The half-angle is measured from the
//! dynamics, so it grows with both the step size and `view`.

/// Where the window is in its life cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPhase {
    Priming,
    InWindow,
    OutsideWindow,
}

/// What a tick means for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowTick {
    /// A new orbit's window opened; this tick is its first sample
    Entered { orbit: usize },
    /// Another sample in the open window
    Sample,
    /// The window closed; `finished` is set once the orbit target is passed
    Left { finished: bool },
    /// Away from perihelion
    Outside,
}

impl WindowTick {
    /// Whether the tick produces a data row
    pub fn is_sample(self) -> bool {
        matches!(self, WindowTick::Entered { .. } | WindowTick::Sample)
    }
}

#[derive(Debug, Clone)]
pub struct PerihelionWindow {
    remaining_priming_steps: usize,
    window_half_angle: f64, // [rad]
    inside_window: bool,
    points_in_window: usize,
    orbits_completed: usize,
    target_orbits: usize, // 0 = unbounded
}

impl PerihelionWindow {
    pub fn new(view: usize, target_orbits: usize) -> Self {
        Self {
            remaining_priming_steps: view,
            window_half_angle: 0.0,
            inside_window: false,
            points_in_window: 0,
            orbits_completed: 0,
            target_orbits,
        }
    }

    pub fn phase(&self) -> WindowPhase {
        if self.remaining_priming_steps > 0 {
            WindowPhase::Priming
        } else if self.inside_window {
            WindowPhase::InWindow
        } else {
            WindowPhase::OutsideWindow
        }
    }

    pub fn window_half_angle(&self) -> f64 {
        self.window_half_angle
    }

    pub fn inside_window(&self) -> bool {
        self.inside_window
    }

    pub fn points_in_window(&self) -> usize {
        self.points_in_window
    }

    pub fn orbits_completed(&self) -> usize {
        self.orbits_completed
    }

    /// Classify one tick from its true anomaly [rad]
    pub fn observe(&mut self, true_anomaly: f64) -> WindowTick {
        if self.remaining_priming_steps > 0 {
            self.remaining_priming_steps -= 1;
            self.window_half_angle = true_anomaly.abs();
            self.inside_window = true;
        } else {
            self.inside_window = true_anomaly.abs() < self.window_half_angle;
        }

        if self.inside_window {
            let tick = if self.points_in_window == 0 {
                self.orbits_completed += 1;
                WindowTick::Entered { orbit: self.orbits_completed }
            } else {
                WindowTick::Sample
            };
            self.points_in_window += 1;
            tick
        } else if self.points_in_window > 0 {
            self.points_in_window = 0;
            WindowTick::Left {
                finished: self.target_orbits != 0 && self.orbits_completed > self.target_orbits,
            }
        } else {
            WindowTick::Outside
        }
    }
}
