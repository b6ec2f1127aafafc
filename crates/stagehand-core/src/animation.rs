//! Easing curves shared by interval actions and transitions.

#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Spring {
        damping: f32,
        stiffness: f32,
    },
    /// `t^rate`
    InRate(f32),
    /// `t^(1/rate)`
    OutRate(f32),
    InOutRate(f32),
    /// Caller-supplied curve; should map 0 to 0 and 1 to 1.
    #[cfg_attr(feature = "serde", serde(skip))]
    Custom(fn(f32) -> f32),
}

impl Easing {
    pub fn apply(&self, t: f32) -> f32 {
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::Spring { damping, stiffness } => {
                let omega = (stiffness / damping).sqrt();
                let zeta = damping / (2.0 * (stiffness * damping).sqrt());

                if zeta < 1.0 {
                    let omega_d = omega * (1.0 - zeta * zeta).sqrt();
                    let t = t * 2.0;
                    1.0 - ((-zeta * omega * t).exp() * (omega_d * t).cos())
                } else {
                    t * (2.0 - t)
                }
            }
            Easing::InRate(rate) => t.powf(rate),
            Easing::OutRate(rate) => t.powf(1.0 / rate),
            Easing::InOutRate(rate) => {
                let t2 = t * 2.0;
                if t2 < 1.0 {
                    0.5 * t2.powf(rate)
                } else {
                    1.0 - 0.5 * (2.0 - t2).powf(rate)
                }
            }
            Easing::Custom(f) => f(t),
        }
    }

    /// Curve to use when the eased action is played backwards.
    pub fn reversed(&self) -> Easing {
        match *self {
            Easing::EaseIn => Easing::EaseOut,
            Easing::EaseOut => Easing::EaseIn,
            Easing::InRate(r) => Easing::OutRate(r),
            Easing::OutRate(r) => Easing::InRate(r),
            other => other,
        }
    }
}

pub trait Interpolate {
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for crate::Vec2 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self.lerp(*other, t)
    }
}

impl Interpolate for u8 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        (*self as f32 + (*other as f32 - *self as f32) * t)
            .round()
            .clamp(0.0, 255.0) as u8
    }
}

impl Interpolate for crate::Color {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        crate::Color(
            self.0.interpolate(&other.0, t),
            self.1.interpolate(&other.1, t),
            self.2.interpolate(&other.2, t),
            self.3.interpolate(&other.3, t),
        )
    }
}
