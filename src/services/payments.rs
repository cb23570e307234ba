//! Payment handoff
//!
//! Produces the UPI payment URL for a bill. Rendering the QR image is the
//! frontend's concern; the core only supplies the payee identity, amount
//! and bill number.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::{BillingConfig, PaymentConfig};

/// Everything the payment/QR collaborator needs for one bill
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentRequest {
    pub payment_url: String,
    pub upi_id: String,
    pub payee_name: String,
    pub amount: Decimal,
    pub currency: String,
    pub bill_number: String,
}

#[derive(Clone)]
pub struct PaymentsService {
    payment: PaymentConfig,
    currency: String,
}

impl PaymentsService {
    pub fn new(payment: PaymentConfig, billing: &BillingConfig) -> Self {
        Self {
            payment,
            currency: billing.currency.clone(),
        }
    }

    /// Build the payment request for one bill, including the
    /// `upi://pay?...` deep link
    pub fn payment_request(&self, amount: Decimal, bill_number: &str) -> PaymentRequest {
        let payment_url = format!(
            "upi://pay?pa={}&pn={}&am={}&tn=Parking%20Bill%20{}",
            self.payment.upi_id,
            encode_component(&self.payment.payee_name),
            amount,
            bill_number,
        );

        PaymentRequest {
            payment_url,
            upi_id: self.payment.upi_id.clone(),
            payee_name: self.payment.payee_name.clone(),
            amount,
            currency: self.currency.clone(),
            bill_number: bill_number.to_string(),
        }
    }
}

/// Percent-encode the characters that actually occur in payee names
fn encode_component(s: &str) -> String {
    s.replace('%', "%25").replace(' ', "%20").replace('&', "%26")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BillingConfig;

    fn service() -> PaymentsService {
        PaymentsService::new(
            PaymentConfig {
                upi_id: "parkwise@okicici".to_string(),
                payee_name: "Parkwise Smart Parking".to_string(),
            },
            &BillingConfig::default(),
        )
    }

    #[test]
    fn test_payment_url_shape() {
        let request = service().payment_request(Decimal::new(2000, 2), "BILL-1A2B3C4D");
        assert_eq!(
            request.payment_url,
            "upi://pay?pa=parkwise@okicici&pn=Parkwise%20Smart%20Parking&am=20.00&tn=Parking%20Bill%20BILL-1A2B3C4D"
        );
        assert_eq!(request.amount, Decimal::new(2000, 2));
        assert_eq!(request.bill_number, "BILL-1A2B3C4D");
    }
}
