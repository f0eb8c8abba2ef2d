use crate::block::QuantityValue;
use crate::quantity::Quantity;

impl From<f64> for QuantityValue {
    fn from(value: f64) -> Self {
        QuantityValue::Double(value)
    }
}

impl From<i32> for QuantityValue {
    fn from(value: i32) -> Self {
        QuantityValue::Int(value)
    }
}

/// Values of one particle to be encoded into a record
///
/// Quantities the stream layout does not carry are dropped on write;
/// layout quantities without a value are written as zero bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Particle {
    values: Vec<(Quantity, QuantityValue)>,
}

impl Particle {
    /// Particle with no values set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, quantity: Quantity, value: impl Into<QuantityValue>) -> Self {
        self.set(quantity, value);
        self
    }

    /// Set or replace a value
    pub fn set(&mut self, quantity: Quantity, value: impl Into<QuantityValue>) {
        let value = value.into();
        match self.values.iter_mut().find(|(q, _)| *q == quantity) {
            Some(slot) => slot.1 = value,
            None => self.values.push((quantity, value)),
        }
    }

    /// Value of a quantity, if set
    pub fn get(&self, quantity: Quantity) -> Option<QuantityValue> {
        self.values
            .iter()
            .find(|(q, _)| *q == quantity)
            .map(|(_, v)| *v)
    }

    /// All set values
    pub fn values(&self) -> &[(Quantity, QuantityValue)] {
        &self.values
    }
}
