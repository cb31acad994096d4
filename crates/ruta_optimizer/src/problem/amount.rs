use std::ops::{Add, AddAssign, Sub};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Quantity, volume and weight carried or demanded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Amount {
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub weight: f64,
}

impl Amount {
    pub const ZERO: Amount = Amount {
        quantity: 0.0,
        volume: 0.0,
        weight: 0.0,
    };

    pub const fn new(quantity: f64, volume: f64, weight: f64) -> Self {
        Amount {
            quantity,
            volume,
            weight,
        }
    }

    pub const fn quantity(quantity: f64) -> Self {
        Amount::new(quantity, 0.0, 0.0)
    }

    pub fn is_non_negative(&self) -> bool {
        self.quantity >= 0.0 && self.volume >= 0.0 && self.weight >= 0.0
    }

    /// Component-wise amount by which `self` exceeds `capacity`, zero where it fits.
    pub fn excess_over(&self, capacity: &Amount) -> Amount {
        Amount {
            quantity: (self.quantity - capacity.quantity).max(0.0),
            volume: (self.volume - capacity.volume).max(0.0),
            weight: (self.weight - capacity.weight).max(0.0),
        }
    }

    /// True when every component of `self` is at least the one in `other`.
    pub fn dominates(&self, other: &Amount) -> bool {
        self.quantity >= other.quantity && self.volume >= other.volume && self.weight >= other.weight
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount {
            quantity: self.quantity + rhs.quantity,
            volume: self.volume + rhs.volume,
            weight: self.weight + rhs.weight,
        }
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        *self = *self + rhs;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount {
            quantity: self.quantity - rhs.quantity,
            volume: self.volume - rhs.volume,
            weight: self.weight - rhs.weight,
        }
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, amount| acc + amount)
    }
}
