/// A linear axis mapping data values onto a pixel span.
#[derive(Debug, Clone, Copy)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub px_min: f64,
    pub px_max: f64,
}

impl Axis {
    pub fn to_pixel(&self, value: f64) -> f64 {
        let frac = (value - self.min) / (self.max - self.min);
        self.px_min + frac * (self.px_max - self.px_min)
    }

    /// Tick positions inside the axis range, with their step.
    pub fn ticks(&self, target: usize) -> (Vec<f64>, f64) {
        let range = self.max - self.min;
        if !(range > 0.0) {
            return (vec![self.min], 1.0);
        }
        let step = nice_step(range / target.max(2) as f64);
        let first = (self.min / step).ceil() as i64;
        let last = (self.max / step + 1e-9).floor() as i64;
        ((first..=last).map(|i| i as f64 * step).collect(), step)
    }
}

/// "Nice numbers" tick spacing: 1, 2 or 5 times a power of ten.
pub fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    };
    if decimals == 0 {
        let v = if value.abs() < step * 0.01 { 0.0 } else { value };
        format!("{}", v.round() as i64)
    } else {
        format!("{:.prec$}", value, prec = decimals)
    }
}
