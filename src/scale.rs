use crate::frame::{Column, Frame};

/// Kept in original units so age cutoffs stay readable in the report.
pub const UNSCALED_COLUMNS: &[&str] = &["Age"];

/// Value every cell of a constant column collapses to.
const CONSTANT_FILL: f64 = 0.5;

/// Min-max scale every numeric column into [0,1], in place. A column with a
/// single distinct value (or none at all) becomes 0.5 everywhere, missing
/// cells included. Runs once over the whole table, before any archetype
/// split, so cohorts are compared on global ranges.
pub fn scale_frame(frame: &mut Frame) {
    for (name, column) in frame.iter_mut() {
        if UNSCALED_COLUMNS.contains(&name) {
            continue;
        }
        let Column::Number(values) = column else {
            continue;
        };
        scale_column(values);
    }
}

fn scale_column(values: &mut [f64]) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values.iter().filter(|v| v.is_finite()) {
        min = min.min(*value);
        max = max.max(*value);
    }

    if min < max {
        let span = max - min;
        for value in values.iter_mut() {
            if value.is_finite() {
                *value = (*value - min) / span;
            }
        }
    } else {
        values.fill(CONSTANT_FILL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn frame_of(name: &str, values: Vec<f64>) -> Result<Frame> {
        let mut frame = Frame::new(values.len());
        frame.push_column(name, Column::Number(values))?;
        Ok(frame)
    }

    #[test]
    fn min_and_max_hit_the_bounds() -> Result<()> {
        let mut frame = frame_of("Tck/90", vec![2.0, 6.0, 4.0])?;
        scale_frame(&mut frame);
        assert_eq!(frame.numbers("Tck/90")?, [0.0, 1.0, 0.5]);
        Ok(())
    }

    #[test]
    fn constant_column_collapses_to_half() -> Result<()> {
        let mut frame = frame_of("Tck/90", vec![3.0, 3.0, f64::NAN])?;
        scale_frame(&mut frame);
        assert_eq!(frame.numbers("Tck/90")?, [0.5, 0.5, 0.5]);
        Ok(())
    }

    #[test]
    fn missing_values_survive_in_varying_columns() -> Result<()> {
        let mut frame = frame_of("Tck/90", vec![1.0, f64::NAN, 3.0])?;
        scale_frame(&mut frame);
        let scaled = frame.numbers("Tck/90")?;
        assert_eq!(scaled[0], 0.0);
        assert!(scaled[1].is_nan());
        assert_eq!(scaled[2], 1.0);
        Ok(())
    }

    #[test]
    fn age_is_exempt() -> Result<()> {
        let mut frame = Frame::new(2);
        frame.push_column("Age", Column::Number(vec![19.0, 34.0]))?;
        frame.push_column("Mins", Column::Number(vec![900.0, 2700.0]))?;
        scale_frame(&mut frame);
        assert_eq!(frame.numbers("Age")?, [19.0, 34.0]);
        assert_eq!(frame.numbers("Mins")?, [0.0, 1.0]);
        Ok(())
    }
}
