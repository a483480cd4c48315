//! In-memory adjustment log with a version pointer
//!
//! Records are kept in sequence order starting at 1; `current` names the
//! active record (0 = unadjusted base path). Apply truncates everything
//! above `current` before appending, undo/redo only move the pointer, and
//! reset clears the log.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::geometry::angles_from_positions;
use crate::types::{
    AdjustmentRecord, AdjustmentState, BasePath, CalculatedTrajectory, MdWindow, Offset,
};

use super::AdjustmentError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentHistory {
    base: BasePath,
    records: Vec<AdjustmentRecord>,
    current: u32,
}

impl AdjustmentHistory {
    /// Start a history over `base`. All position channels must match `md`
    /// and there must be at least two stations.
    pub fn new(base: BasePath) -> Result<Self, AdjustmentError> {
        let n = base.md.len();
        if n < 2 {
            return Err(AdjustmentError::InsufficientStations(n));
        }
        let mut lengths = vec![
            ("northing", base.northing.len()),
            ("easting", base.easting.len()),
            ("tvd", base.tvd.len()),
        ];
        if let Some(inc) = &base.inc {
            lengths.push(("inc", inc.len()));
        }
        if let Some(azi) = &base.azi {
            lengths.push(("azi", azi.len()));
        }
        if lengths.iter().any(|&(_, len)| len != n) {
            return Err(AdjustmentError::LengthMismatch(format!(
                "md={n}, {}",
                lengths
                    .iter()
                    .map(|(name, len)| format!("{name}={len}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }
        Ok(Self {
            base,
            records: Vec::new(),
            current: 0,
        })
    }

    pub fn from_trajectory(calc: &CalculatedTrajectory) -> Result<Self, AdjustmentError> {
        Self::new(BasePath {
            md: calc.md.clone(),
            northing: calc.northing.clone(),
            easting: calc.easting.clone(),
            tvd: calc.tvd.clone(),
            inc: Some(calc.inc.clone()),
            azi: Some(calc.azi.clone()),
        })
    }

    pub fn base(&self) -> &BasePath {
        &self.base
    }

    pub fn records(&self) -> &[AdjustmentRecord] {
        &self.records
    }

    /// Active sequence, 0 when unadjusted.
    pub fn current_sequence(&self) -> u32 {
        self.current
    }

    pub fn current_record(&self) -> Option<&AdjustmentRecord> {
        self.current
            .checked_sub(1)
            .and_then(|i| self.records.get(i as usize))
    }

    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    pub fn can_redo(&self) -> bool {
        (self.current as usize) < self.records.len()
    }

    /// Northing, easting and TVD of the active path.
    fn current_path(&self) -> (&[f64], &[f64], &[f64]) {
        match self.current_record() {
            Some(r) => (&r.north_adjusted, &r.east_adjusted, &r.tvd_adjusted),
            None => (&self.base.northing, &self.base.easting, &self.base.tvd),
        }
    }

    /// Shift every station with MD in `window` (inclusive) by `offset`,
    /// on top of the active path.
    ///
    /// Any records above the active one are dropped first, so redo is no
    /// longer possible afterwards.
    pub fn apply(
        &mut self,
        window: MdWindow,
        offset: Offset,
        recalculate: bool,
    ) -> Result<AdjustmentState, AdjustmentError> {
        if !(window.start.is_finite() && window.end.is_finite() && window.start < window.end) {
            return Err(AdjustmentError::InvalidWindow {
                start: window.start,
                end: window.end,
            });
        }
        if ![offset.x, offset.y, offset.z].iter().all(|v| v.is_finite()) {
            return Err(AdjustmentError::InvalidOffset {
                x: offset.x,
                y: offset.y,
                z: offset.z,
            });
        }

        let (north, east, tvd) = self.current_path();
        let mut north = north.to_vec();
        let mut east = east.to_vec();
        let mut tvd = tvd.to_vec();
        let mut affected = 0usize;
        for (i, &md) in self.base.md.iter().enumerate() {
            if window.contains(md) {
                north[i] += offset.y;
                east[i] += offset.x;
                tvd[i] += offset.z;
                affected += 1;
            }
        }

        let (inc_recalculated, azi_recalculated) = if recalculate {
            let (inc, azi) = angles_from_positions(&north, &east, &tvd, self.seed())?;
            (Some(inc), Some(azi))
        } else {
            (None, None)
        };

        let dropped = self.records.len() - self.current as usize;
        self.records.truncate(self.current as usize);
        for record in &mut self.records {
            record.is_current = false;
        }

        let sequence = self.current + 1;
        self.records.push(AdjustmentRecord {
            sequence,
            window,
            offset,
            north_adjusted: north,
            east_adjusted: east,
            tvd_adjusted: tvd,
            inc_recalculated,
            azi_recalculated,
            is_current: true,
            created_at: Utc::now(),
        });
        self.current = sequence;

        tracing::debug!(sequence, affected, dropped, "adjustment applied");

        Ok(self.state(format!(
            "Applied adjustment {sequence} to {affected} stations in md [{:.2}, {:.2}]",
            window.start, window.end
        )))
    }

    /// Step back one record (or to the base path).
    pub fn undo(&mut self) -> Result<AdjustmentState, AdjustmentError> {
        if !self.can_undo() {
            return Err(AdjustmentError::NothingToUndo);
        }
        self.current -= 1;
        self.sync_current_flags();
        tracing::debug!(sequence = self.current, "adjustment undone");

        let message = if self.current == 0 {
            "Undone to original path".to_string()
        } else {
            format!("Undone to adjustment {}", self.current)
        };
        Ok(self.state(message))
    }

    pub fn redo(&mut self) -> Result<AdjustmentState, AdjustmentError> {
        if !self.can_redo() {
            return Err(AdjustmentError::NothingToRedo);
        }
        self.current += 1;
        self.sync_current_flags();
        tracing::debug!(sequence = self.current, "adjustment redone");
        Ok(self.state(format!("Redone adjustment {}", self.current)))
    }

    /// Discard every record and return the unmodified base path.
    pub fn reset(&mut self) -> AdjustmentState {
        let discarded = self.records.len();
        self.records.clear();
        self.current = 0;
        tracing::debug!(discarded, "adjustments reset");
        self.state(format!("Reset to original path ({discarded} adjustments discarded)"))
    }

    /// Inclination and azimuth recovered from the active path.
    pub fn recalculate_angles(&self) -> Result<(Vec<f64>, Vec<f64>), AdjustmentError> {
        let (north, east, tvd) = self.current_path();
        Ok(angles_from_positions(north, east, tvd, self.seed())?)
    }

    /// Snapshot of the active path without changing anything.
    pub fn current_state(&self) -> AdjustmentState {
        let message = match self.current {
            0 => "No adjustment applied".to_string(),
            seq => format!("Adjustment {seq} active"),
        };
        self.state(message)
    }

    fn seed(&self) -> Option<(f64, f64)> {
        match (&self.base.inc, &self.base.azi) {
            (Some(inc), Some(azi)) => inc.first().copied().zip(azi.first().copied()),
            _ => None,
        }
    }

    fn sync_current_flags(&mut self) {
        let current = self.current;
        for record in &mut self.records {
            record.is_current = record.sequence == current;
        }
    }

    fn state(&self, message: String) -> AdjustmentState {
        let (north, east, tvd) = self.current_path();
        let record = self.current_record();
        AdjustmentState {
            sequence: self.current,
            md_data: self.base.md.clone(),
            north_adjusted: north.to_vec(),
            east_adjusted: east.to_vec(),
            tvd_adjusted: tvd.to_vec(),
            inc_recalculated: record.and_then(|r| r.inc_recalculated.clone()),
            azi_recalculated: record.and_then(|r| r.azi_recalculated.clone()),
            has_adjustment: record.is_some(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BasePath {
        BasePath {
            md: vec![0.0, 100.0, 200.0, 300.0, 400.0],
            northing: vec![0.0, 10.0, 20.0, 30.0, 40.0],
            easting: vec![0.0; 5],
            tvd: vec![0.0, 99.0, 198.0, 297.0, 396.0],
            inc: None,
            azi: None,
        }
    }

    fn history() -> AdjustmentHistory {
        AdjustmentHistory::new(base()).unwrap()
    }

    #[test]
    fn test_apply_only_touches_window() {
        let mut h = history();
        let s = h
            .apply(MdWindow::new(100.0, 200.0), Offset::new(5.0, -2.0, 1.0), false)
            .unwrap();
        assert_eq!(s.sequence, 1);
        assert!(s.has_adjustment);
        assert_eq!(s.east_adjusted, vec![0.0, 5.0, 5.0, 0.0, 0.0]);
        assert_eq!(s.north_adjusted, vec![0.0, 8.0, 18.0, 30.0, 40.0]);
        assert_eq!(s.tvd_adjusted, vec![0.0, 100.0, 199.0, 297.0, 396.0]);
        assert!(s.inc_recalculated.is_none());
    }

    #[test]
    fn test_offsets_accumulate() {
        let mut h = history();
        h.apply(MdWindow::new(0.0, 400.0), Offset::new(1.0, 0.0, 0.0), false)
            .unwrap();
        let s = h
            .apply(MdWindow::new(0.0, 400.0), Offset::new(1.0, 0.0, 0.0), false)
            .unwrap();
        assert_eq!(s.east_adjusted, vec![2.0; 5]);
    }

    #[test]
    fn test_rejects_base_with_fewer_than_two_stations() {
        for n in [0, 1] {
            let short = BasePath {
                md: vec![0.0; n],
                northing: vec![0.0; n],
                easting: vec![0.0; n],
                tvd: vec![0.0; n],
                inc: None,
                azi: None,
            };
            let err = AdjustmentHistory::new(short).unwrap_err();
            assert!(matches!(err, AdjustmentError::InsufficientStations(got) if got == n));
        }
    }

    #[test]
    fn test_invalid_window() {
        let mut h = history();
        let err = h
            .apply(MdWindow::new(200.0, 200.0), Offset::default(), false)
            .unwrap_err();
        assert!(matches!(err, AdjustmentError::InvalidWindow { .. }));
        assert_eq!(h.current_sequence(), 0);
    }

    #[test]
    fn test_undo_redo_pointer() {
        let mut h = history();
        assert!(matches!(h.undo(), Err(AdjustmentError::NothingToUndo)));
        h.apply(MdWindow::new(0.0, 100.0), Offset::new(1.0, 1.0, 1.0), false)
            .unwrap();
        h.apply(MdWindow::new(0.0, 100.0), Offset::new(1.0, 1.0, 1.0), false)
            .unwrap();
        assert_eq!(h.undo().unwrap().sequence, 1);
        assert_eq!(h.records().len(), 2);
        assert_eq!(h.records().iter().filter(|r| r.is_current).count(), 1);
        assert!(h.records()[0].is_current);
        assert_eq!(h.redo().unwrap().sequence, 2);
        assert!(matches!(h.redo(), Err(AdjustmentError::NothingToRedo)));
    }

    #[test]
    fn test_undo_to_base_has_no_current_record() {
        let mut h = history();
        h.apply(MdWindow::new(0.0, 100.0), Offset::new(1.0, 0.0, 0.0), false)
            .unwrap();
        let s = h.undo().unwrap();
        assert_eq!(s.sequence, 0);
        assert!(!s.has_adjustment);
        assert!(h.records().iter().all(|r| !r.is_current));
        assert_eq!(s.east_adjusted, base().easting);
    }

    #[test]
    fn test_reset_clears_log() {
        let mut h = history();
        h.apply(MdWindow::new(0.0, 100.0), Offset::new(1.0, 0.0, 0.0), false)
            .unwrap();
        let s = h.reset();
        assert!(!s.has_adjustment);
        assert!(h.records().is_empty());
        assert_eq!(s.north_adjusted, base().northing);
        assert!(!h.can_redo());
    }

    #[test]
    fn test_length_mismatch() {
        let mut b = base();
        b.tvd.pop();
        assert!(matches!(
            AdjustmentHistory::new(b),
            Err(AdjustmentError::LengthMismatch(_))
        ));
    }

    #[test]
    fn test_recalculated_angles_attached() {
        let mut h = history();
        let s = h
            .apply(MdWindow::new(300.0, 400.0), Offset::new(0.0, 0.0, 0.0), true)
            .unwrap();
        let inc = s.inc_recalculated.unwrap();
        let azi = s.azi_recalculated.unwrap();
        assert_eq!(inc.len(), 5);
        // straight line 10 north per 99 down
        let expected = (10.0_f64).atan2(99.0).to_degrees();
        assert!(inc.iter().all(|i| (i - expected).abs() < 1e-9));
        assert!(azi.iter().all(|a| a.abs() < 1e-9));
    }
}
