use serde::{Deserialize, Serialize};

use super::DecodeError;
use crate::domain::PaymentStatus;
use crate::entities::payments;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    pub id: i32,
    pub payment_id: String,
    pub enrollment_id: String,
    pub amount: f64,
    pub payment_method: String,
    pub reference: String,
    pub transaction_id: Option<String>,
    pub status: PaymentStatus,
    pub created_at: String,
    pub completed_at: Option<String>,
}

impl TryFrom<payments::Model> for Payment {
    type Error = DecodeError;

    fn try_from(model: payments::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            status: model.status.parse()?,
            id: model.id,
            payment_id: model.payment_id,
            enrollment_id: model.enrollment_id,
            amount: model.amount,
            payment_method: model.payment_method,
            reference: model.reference,
            transaction_id: model.transaction_id,
            created_at: model.created_at,
            completed_at: model.completed_at,
        })
    }
}

/// Payment fields supplied by the payer, without the enrollment link.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PaymentDetails {
    pub amount: f64,
    pub payment_method: String,
    pub reference: String,
}

impl PaymentDetails {
    #[must_use]
    pub fn for_enrollment(self, enrollment_id: impl Into<String>) -> NewPayment {
        NewPayment {
            enrollment_id: enrollment_id.into(),
            amount: self.amount,
            payment_method: self.payment_method,
            reference: self.reference,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewPayment {
    pub enrollment_id: String,
    pub amount: f64,
    pub payment_method: String,
    pub reference: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PaymentStats {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    pub failed: u64,
}
