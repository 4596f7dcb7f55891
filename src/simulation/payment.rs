//! Payment methods accepted at the exit gates

use log::info;
use rust_decimal::Decimal;

/// Something that can take a payment.
///
/// Implementations must not call back into the lot: exit gates hold the
/// floor lock while the payment runs.
pub trait PaymentProcessor {
    fn name(&self) -> &str;

    /// Take `amount`. Returns false if the payment did not go through.
    fn process(&self, amount: Decimal) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CashPayment;

impl PaymentProcessor for CashPayment {
    fn name(&self) -> &str {
        "cash"
    }

    fn process(&self, amount: Decimal) -> bool {
        info!("Processing cash payment of ${:.2}", amount);
        true
    }
}

/// Credit card, optionally with a limit above which charges are declined
#[derive(Debug, Clone, Copy, Default)]
pub struct CardPayment {
    pub limit: Option<Decimal>,
}

impl CardPayment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Decimal) -> Self {
        Self { limit: Some(limit) }
    }
}

impl PaymentProcessor for CardPayment {
    fn name(&self) -> &str {
        "credit card"
    }

    fn process(&self, amount: Decimal) -> bool {
        if let Some(limit) = self.limit {
            if amount > limit {
                info!(
                    "Credit card declined: ${:.2} exceeds limit ${:.2}",
                    amount, limit
                );
                return false;
            }
        }
        info!("Processing credit card payment of ${:.2}", amount);
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UpiPayment;

impl PaymentProcessor for UpiPayment {
    fn name(&self) -> &str {
        "UPI"
    }

    fn process(&self, amount: Decimal) -> bool {
        info!("Processing UPI payment of ${:.2}", amount);
        true
    }
}
