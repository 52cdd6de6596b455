use chrono::NaiveDate;
use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaymentError {
    #[error("invalid argument: amount must not be negative, got {amount}")]
    NegativeAmount {
        amount: Money,
    },

    #[error("invalid argument: amount is not a finite number: {value}")]
    NonFiniteAmount {
        value: String,
    },

    #[error("invalid argument: invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid argument: {date} shifted by {offset_days} days is out of range")]
    DateOutOfRange {
        date: NaiveDate,
        offset_days: i64,
    },

    #[error("invalid argument: line item {service}: {message}")]
    InvalidLineItem {
        service: String,
        message: String,
    },

    #[error("invalid argument: amount overflow")]
    AmountOverflow,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

impl PaymentError {
    /// true for failures caused by the caller's arguments
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, PaymentError::InvalidConfiguration { .. })
    }
}

pub type Result<T> = std::result::Result<T, PaymentError>;
