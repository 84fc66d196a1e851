//! Dash Patterns
//!
//! A [Dash] splits a polyline into the runs where the pattern is "on".
//! Runs are only generated for the portion of the polyline inside an
//! optional clip rectangle; the pattern state where a segment enters the
//! rectangle is computed from its arc length, so the cost follows the
//! visible length and not the total length.
//!
//!     use scanfill::{Dash, Polyline, Point};
//!
//!     let line = Polyline::new(vec![Point::new(0.0, 0.0), Point::new(30.0, 0.0)], false);
//!     let dash = Dash::new(&[10.0, 5.0], 0.0).unwrap();
//!     let runs = dash.runs(&line, None);
//!     assert_eq!(runs.len(), 2);
//!     assert_eq!(runs[0].points, vec![Point::new(0.0,0.0), Point::new(10.0,0.0)]);
//!     assert_eq!(runs[1].points, vec![Point::new(15.0,0.0), Point::new(25.0,0.0)]);
//!
//! [Dash]: struct.Dash.html

use crate::paths::Point;
use crate::flatten::Polyline;
use crate::clip::Rectangle;
use crate::clip::clip_segment;
use crate::error::Error;
use crate::error::Result;

use log::trace;

/// Dash Pattern with a Phase
#[derive(Debug,Clone,Default,PartialEq)]
pub struct Dash {
    /// Alternating on and off lengths, starting with on; always even length
    pattern: Vec<f64>,
    /// Offset into the pattern at the start of each subpath
    phase: f64,
    /// Sum of the pattern
    period: f64,
}

/// Location within a Dash pattern
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct DashState {
    /// Index of the current pattern entry, even entries are "on"
    pub index: usize,
    /// Length remaining in the current entry
    pub remain: f64,
}

impl DashState {
    pub fn is_on(&self) -> bool {
        self.index % 2 == 0
    }
}

impl Dash {
    /// Create a new Dash pattern
    ///
    /// An empty pattern is a solid line. Patterns with an odd number of
    /// entries are repeated once. Entries must be finite and non-negative
    /// with a positive sum.
    pub fn new(pattern: &[f64], phase: f64) -> Result<Self> {
        if pattern.is_empty() {
            return Ok(Self::solid());
        }
        if let Some(v) = pattern.iter().find(|v| ! v.is_finite() || **v < 0.0) {
            return Err(Error::InvalidDash(format!("invalid dash length {}", v)));
        }
        if ! phase.is_finite() {
            return Err(Error::InvalidDash(format!("invalid dash phase {}", phase)));
        }
        let mut pattern = pattern.to_vec();
        if pattern.len() % 2 == 1 {
            pattern.extend_from_slice(&pattern.clone());
        }
        let period : f64 = pattern.iter().sum();
        if period <= 0.0 {
            return Err(Error::InvalidDash(format!("dash pattern {:?} has zero length", pattern)));
        }
        Ok(Self { pattern, phase, period })
    }
    /// Solid line, no dashes
    pub fn solid() -> Self {
        Self { pattern: vec![], phase: 0.0, period: 0.0 }
    }
    /// Pattern is a solid line
    pub fn is_solid(&self) -> bool {
        self.pattern.is_empty()
    }
    /// Pattern entries
    pub fn pattern(&self) -> &[f64] {
        &self.pattern
    }
    pub fn phase(&self) -> f64 {
        self.phase
    }
    /// Pattern state at arc length `s` from the start of a subpath
    pub fn state_at(&self, s: f64) -> DashState {
        if self.is_solid() {
            return DashState { index: 0, remain: std::f64::INFINITY };
        }
        let mut r = (s + self.phase).rem_euclid(self.period);
        for (index, &d) in self.pattern.iter().enumerate() {
            if r < d {
                return DashState { index, remain: d - r };
            }
            r -= d;
        }
        // Rounding left r at the end of the period
        DashState { index: 0, remain: self.pattern[0] }
    }
    fn advance(&self, state: &mut DashState) {
        state.index = (state.index + 1) % self.pattern.len();
        state.remain = self.pattern[state.index];
    }
    /// Split a polyline into its "on" runs
    ///
    /// Only the parts of the polyline inside `clip` produce runs. A closed
    /// polyline that is never interrupted is returned closed; otherwise
    /// every run is open. On closed polylines, a run reaching the end is
    /// joined with a run leaving the start.
    pub fn runs(&self, line: &Polyline, clip: Option<&Rectangle<f64>>) -> Vec<Polyline> {
        let line = line.clean();
        let pts = &line.points;
        if pts.is_empty() {
            return vec![];
        }
        if pts.len() == 1 {
            let p = pts[0];
            let visible = clip.map(|r| r.contains(p.x, p.y)).unwrap_or(true);
            if visible && self.state_at(0.0).is_on() {
                return vec![Polyline::new(vec![p], false)];
            }
            return vec![];
        }
        let mut segs : Vec<(Point, Point)> = pts.windows(2).map(|w| (w[0], w[1])).collect();
        if line.closed {
            segs.push((pts[pts.len()-1], pts[0]));
        }

        let mut runs : Vec<Vec<Point>> = vec![];
        let mut current : Option<Vec<Point>> = None;
        let mut state = self.state_at(0.0);
        let mut starts_on = false;
        let mut broken = false;
        let mut prev_visible_end = true;
        let mut s0 = 0.0;

        for (i, &(a, b)) in segs.iter().enumerate() {
            let len = a.distance(&b);
            let visible = match clip {
                None => Some((a, b, 0.0, 1.0)),
                Some(r) => clip_segment(&a, &b, r),
            };
            let (p0, p1, t0, t1) = match visible {
                Some(v) => v,
                None => {
                    trace!("DASH: segment {} outside clip", i);
                    if let Some(run) = current.take() {
                        runs.push(run);
                    }
                    broken = true;
                    prev_visible_end = false;
                    s0 += len;
                    continue;
                }
            };
            if t0 > 0.0 || ! prev_visible_end {
                if let Some(run) = current.take() {
                    runs.push(run);
                }
                broken = true;
                state = self.state_at(s0 + t0 * len);
            }
            if i == 0 && t0 == 0.0 {
                starts_on = state.is_on();
            }
            // Positions are measured from the entry point p0
            let vis = p0.distance(&p1);
            let at = |w: f64| if w >= vis { p1 } else { p0.lerp(&p1, w / vis) };
            let mut w = 0.0;
            let mut stalled = 0;
            loop {
                if state.is_on() {
                    let run = current.get_or_insert_with(Vec::new);
                    let p = at(w);
                    if run.last() != Some(&p) {
                        run.push(p);
                    }
                    let q = at(w + state.remain);
                    if run.last() != Some(&q) {
                        run.push(q);
                    }
                } else {
                    if let Some(run) = current.take() {
                        runs.push(run);
                    }
                    broken = true;
                }
                let next = w + state.remain;
                if next > vis {
                    state.remain -= vis - w;
                    break;
                }
                self.advance(&mut state);
                if next > w {
                    stalled = 0;
                } else {
                    stalled += 1;
                    if stalled > self.pattern.len() {
                        trace!("DASH: no progress at {} on segment {}", w, i);
                        break;
                    }
                }
                w = next;
                if w >= vis {
                    break;
                }
            }
            prev_visible_end = t1 >= 1.0;
            s0 += len;
        }
        let reaches_end = current.is_some() && prev_visible_end;
        if let Some(run) = current.take() {
            runs.push(run);
        }

        if line.closed && ! broken && runs.len() == 1 {
            let mut ring = runs.remove(0);
            if ring.len() > 1 && ring.first() == ring.last() {
                ring.pop();
            }
            return vec![Polyline::new(ring, true)];
        }
        if line.closed && starts_on && reaches_end && runs.len() > 1 {
            let first = runs.remove(0);
            if let Some(last) = runs.last_mut() {
                last.extend(first.into_iter().skip(1));
            }
        }
        runs.into_iter().map(|r| Polyline::new(r, false)).collect()
    }
}
