//! Checkout: validating customer details and freezing the cart into an order draft.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::order::{OrderLine, SubmitError};

/// A single invalid checkout field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("checkout details are invalid: {}", describe(.0))]
    InvalidDetails(Vec<FieldError>),

    #[error("order submission failed: {0}")]
    Submission(#[from] SubmitError),
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CustomerDetails {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Phone number with spaces, dashes and parentheses stripped.
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum DeliveryMethod {
    Pickup,
    Delivery { address: String },
}

/// What the customer filled in on the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub customer: CustomerDetails,
    pub delivery: DeliveryMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl CheckoutRequest {
    pub fn pickup(customer: CustomerDetails) -> Self {
        Self {
            customer,
            delivery: DeliveryMethod::Pickup,
            comment: None,
        }
    }

    pub fn delivery(customer: CustomerDetails, address: impl Into<String>) -> Self {
        Self {
            customer,
            delivery: DeliveryMethod::Delivery {
                address: address.into(),
            },
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Trim every field and check it, reporting all problems at once.
    ///
    /// Blank optional fields (e-mail, comment) become `None`.
    pub fn validate(&self, min_phone_digits: usize) -> Result<CheckoutRequest, CheckoutError> {
        let mut errors = Vec::new();

        let name = self.customer.name.trim().to_string();
        if name.is_empty() {
            errors.push(FieldError {
                field: "name",
                message: "name is required",
            });
        }

        let phone = self.customer.phone.trim().to_string();
        let digits = normalize_phone(&phone);
        if digits.is_empty() || digits.chars().count() < min_phone_digits {
            errors.push(FieldError {
                field: "phone",
                message: "phone number is invalid",
            });
        }

        let delivery = match &self.delivery {
            DeliveryMethod::Pickup => DeliveryMethod::Pickup,
            DeliveryMethod::Delivery { address } => {
                let address = address.trim().to_string();
                if address.is_empty() {
                    errors.push(FieldError {
                        field: "address",
                        message: "delivery address is required",
                    });
                }
                DeliveryMethod::Delivery { address }
            }
        };

        if !errors.is_empty() {
            return Err(CheckoutError::InvalidDetails(errors));
        }

        Ok(CheckoutRequest {
            customer: CustomerDetails {
                name,
                phone,
                email: non_blank(self.customer.email.as_deref()),
            },
            delivery,
            comment: non_blank(self.comment.as_deref()),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Immutable snapshot of a cart at the moment checkout is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub lines: Vec<OrderLine>,
    pub total_price: u64,
    pub customer: CustomerDetails,
    pub delivery: DeliveryMethod,
    pub comment: Option<String>,
}

impl OrderDraft {
    /// Freeze `cart` together with already validated checkout details.
    pub fn new(cart: &Cart, request: CheckoutRequest) -> Self {
        Self {
            lines: cart.items().iter().map(OrderLine::from).collect(),
            total_price: cart.total_price(),
            customer: request.customer,
            delivery: request.delivery,
            comment: request.comment,
        }
    }

    /// Message text for the restaurant's order notification channels.
    pub fn summary_text(&self) -> String {
        let mut out = String::from("*Новый заказ!*\n\n");

        // Writing into a String cannot fail.
        let _ = writeln!(out, "*Имя:* {}", self.customer.name);
        let _ = writeln!(out, "*Телефон:* {}", self.customer.phone);
        if let Some(email) = &self.customer.email {
            let _ = writeln!(out, "*Email:* {email}");
        }
        match &self.delivery {
            DeliveryMethod::Pickup => out.push_str("*Получение:* самовывоз\n"),
            DeliveryMethod::Delivery { address } => {
                let _ = writeln!(out, "*Доставка:* {address}");
            }
        }
        if let Some(comment) = &self.comment {
            let _ = writeln!(out, "*Комментарий:* {comment}");
        }

        out.push_str("\n*Заказ:*\n");
        for line in &self.lines {
            let _ = writeln!(out, "• {} — {} — {} ₽", line.name, line.grams, line.subtotal);
        }

        let _ = write!(out, "\n*Итого: {} ₽*", self.total_price);
        out
    }
}
