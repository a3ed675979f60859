/// Smallest gap kept between `y_min` and `y_max`, in volts.
pub const MIN_Y_SPAN: f64 = 0.01;

/// Visible plot range. X always starts at zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportBounds {
    pub y_min: f64,
    pub y_max: f64,
    pub x_max: f64,
}

impl ViewportBounds {
    /// `[0, ref_voltage]` by `[0, time_scale]`.
    pub fn for_device(ref_voltage: f64, time_scale: f64) -> Self {
        let mut bounds = Self {
            y_min: 0.0,
            y_max: ref_voltage,
            x_max: time_scale,
        };
        bounds.enforce_order();
        bounds
    }

    fn enforce_order(&mut self) {
        if self.y_min >= self.y_max {
            self.y_max = span_above(self.y_min);
        }
    }
}

/// `y_min + MIN_Y_SPAN`, or the next float up where that step is lost to rounding.
fn span_above(y_min: f64) -> f64 {
    let stepped = y_min + MIN_Y_SPAN;
    if stepped > y_min {
        stepped
    } else {
        next_up(y_min)
    }
}

fn next_up(value: f64) -> f64 {
    if value.is_nan() || value == f64::INFINITY {
        return value;
    }
    if value == 0.0 {
        return f64::from_bits(1);
    }
    let bits = value.to_bits();
    if value > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

type RefreshHook = Box<dyn FnMut(&ViewportBounds)>;

/// User-facing setters over [`ViewportBounds`].
///
/// Conflicting Y bounds are never rejected: the max is pushed above the min.
/// Every accepted change is reported to the refresh hook, if one is attached.
pub struct ViewportController {
    bounds: ViewportBounds,
    on_change: Option<RefreshHook>,
}

impl ViewportController {
    pub fn new(bounds: ViewportBounds) -> Self {
        let mut bounds = bounds;
        bounds.enforce_order();
        Self {
            bounds,
            on_change: None,
        }
    }

    pub fn bounds(&self) -> ViewportBounds {
        self.bounds
    }

    pub fn set_refresh_hook(&mut self, hook: impl FnMut(&ViewportBounds) + 'static) {
        self.on_change = Some(Box::new(hook));
    }

    pub fn set_y_min(&mut self, value: f64) {
        if !accept("y_min", value) {
            return;
        }
        if !span_above(value).is_finite() {
            log::warn!("ignoring y_min {value}: no room above it for y_max");
            return;
        }
        self.bounds.y_min = value;
        self.bounds.enforce_order();
        self.notify();
    }

    pub fn set_y_max(&mut self, value: f64) {
        if !accept("y_max", value) {
            return;
        }
        self.bounds.y_max = value;
        self.bounds.enforce_order();
        self.notify();
    }

    pub fn set_x_max(&mut self, value: f64) {
        if !accept("x_max", value) {
            return;
        }
        self.bounds.x_max = value;
        self.notify();
    }

    fn notify(&mut self) {
        let bounds = self.bounds;
        if let Some(hook) = self.on_change.as_mut() {
            hook(&bounds);
        }
    }
}

fn accept(name: &str, value: f64) -> bool {
    if value.is_finite() {
        true
    } else {
        log::warn!("ignoring non-finite {name}: {value}");
        false
    }
}
