//! Domain types for the fee ledger.

use chrono::{DateTime, NaiveDate, Utc};
use feeroll_shared::types::StudentId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use super::balance::BalanceSummary;
use super::error::FeeError;
use crate::calendar::{BillingPeriod, Month};

/// Smallest and largest year a payment may be recorded against.
const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 9999;

/// Largest payment amount or monthly fee the ledger accepts.
///
/// Keeps every sum and `owed_months * monthly_fee` product far below
/// `Decimal::MAX` for any accepted year range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Enrollment status of a student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudentStatus {
    /// Enrolled, obligation keeps accruing.
    #[default]
    Active,
    /// Left or suspended, no further obligation accrues.
    Inactive,
}

/// A student's recurring fee schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSchedule {
    /// Obligation accrued once per calendar month.
    pub monthly_fee: Decimal,
    /// First accrual point.
    pub enrollment_date: NaiveDate,
    /// Enrollment status.
    #[serde(default)]
    pub status: StudentStatus,
    /// Date accrual stopped, set when the student is deactivated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deactivated_on: Option<NaiveDate>,
}

impl FeeSchedule {
    /// Creates an active schedule.
    #[must_use]
    pub const fn new(monthly_fee: Decimal, enrollment_date: NaiveDate) -> Self {
        Self {
            monthly_fee,
            enrollment_date,
            status: StudentStatus::Active,
            deactivated_on: None,
        }
    }

    /// Returns true if the student is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == StudentStatus::Active
    }

    /// The date obligation is evaluated at when the caller asks "as of `as_of`".
    ///
    /// Inactive students stop accruing on their deactivation date. An inactive
    /// schedule without a deactivation date has nothing to freeze against and
    /// accrues up to `as_of`.
    #[must_use]
    pub fn accrual_date(&self, as_of: NaiveDate) -> NaiveDate {
        match (self.status, self.deactivated_on) {
            (StudentStatus::Inactive, Some(cutoff)) => cutoff.min(as_of),
            _ => as_of,
        }
    }
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    /// Cash at the front desk.
    #[default]
    Cash,
    /// Bank transfer or UPI.
    Online,
    /// Cheque.
    Cheque,
    /// Debit or credit card.
    Card,
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "Cash"),
            Self::Online => write!(f, "Online"),
            Self::Cheque => write!(f, "Cheque"),
            Self::Card => write!(f, "Card"),
        }
    }
}

impl std::str::FromStr for PaymentMode {
    type Err = FeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "online" => Ok(Self::Online),
            "cheque" | "check" => Ok(Self::Cheque),
            "card" => Ok(Self::Card),
            _ => Err(FeeError::InvalidPaymentMode(s.to_string())),
        }
    }
}

/// Receipt identifier attached to a payment for traceability.
///
/// Not a business key: period uniqueness is what the ledger enforces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptNumber(pub String);

impl ReceiptNumber {
    /// Returns the receipt number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReceiptNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payment status for a period, derived from the amount and the monthly fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// No payment recorded for the period.
    Unpaid,
    /// Paid exactly the monthly fee.
    Paid,
    /// Paid less than the monthly fee.
    Partial,
    /// Paid more than the monthly fee.
    Overpaid,
}

impl PaymentStatus {
    /// Compares a recorded amount with the monthly fee.
    #[must_use]
    pub fn derive(amount: Decimal, monthly_fee: Decimal) -> Self {
        match amount.cmp(&monthly_fee) {
            std::cmp::Ordering::Greater => Self::Overpaid,
            std::cmp::Ordering::Less => Self::Partial,
            std::cmp::Ordering::Equal => Self::Paid,
        }
    }
}

/// A recorded monthly payment. Created once, never mutated.
///
/// The status is not stored; see [`Payment::status_against`]. Documents that
/// still carry a stored `status` field deserialize with that field ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Period the payment settles.
    #[serde(flatten)]
    pub period: BillingPeriod,
    /// Amount paid, always positive.
    pub amount: Decimal,
    /// When the payment was recorded.
    pub paid_date: DateTime<Utc>,
    /// How the payment was made.
    #[serde(default)]
    pub payment_mode: PaymentMode,
    /// Traceability identifier.
    pub receipt_number: ReceiptNumber,
    /// Free-text note from the front desk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl Payment {
    /// Status of this payment against the given monthly fee.
    #[must_use]
    pub fn status_against(&self, monthly_fee: Decimal) -> PaymentStatus {
        PaymentStatus::derive(self.amount, monthly_fee)
    }
}

/// A payment together with its derived status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    /// The recorded payment.
    #[serde(flatten)]
    pub payment: Payment,
    /// Status derived against the current monthly fee.
    pub status: PaymentStatus,
}

/// Payment status of a single period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStatus {
    /// The period queried.
    pub period: BillingPeriod,
    /// Derived status.
    pub status: PaymentStatus,
    /// Amount recorded, zero when unpaid.
    pub amount: Decimal,
}

/// A student's fee record as held by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFeeRecord {
    /// Student identifier.
    pub id: StudentId,
    /// Human-facing admission number.
    pub student_code: String,
    /// Student's full name.
    pub full_name: String,
    /// Class the student is enrolled in.
    pub class_name: String,
    /// Recurring fee schedule.
    pub schedule: FeeSchedule,
    /// Recorded payments, at most one per period.
    #[serde(default)]
    pub payments: Vec<Payment>,
}

impl StudentFeeRecord {
    /// Creates a record with no payments.
    #[must_use]
    pub fn new(
        student_code: impl Into<String>,
        full_name: impl Into<String>,
        class_name: impl Into<String>,
        schedule: FeeSchedule,
    ) -> Self {
        Self {
            id: StudentId::new(),
            student_code: student_code.into(),
            full_name: full_name.into(),
            class_name: class_name.into(),
            schedule,
            payments: Vec::new(),
        }
    }

    /// Sum of all recorded payment amounts.
    ///
    /// Always re-derived from the payment list; there is no stored counter to drift.
    /// Saturates at `Decimal::MAX` for records that bypassed input validation.
    #[must_use]
    pub fn total_paid(&self) -> Decimal {
        self.payments
            .iter()
            .fold(Decimal::ZERO, |total, p| total.saturating_add(p.amount))
    }

    /// The payment recorded for `period`, if any.
    #[must_use]
    pub fn payment_for(&self, period: BillingPeriod) -> Option<&Payment> {
        self.payments.iter().find(|p| p.period == period)
    }
}

/// A validated request to record a payment.
///
/// Only constructible through [`PaymentInput::new`] or from a
/// [`PaymentRequest`], so the ledger never sees an invalid amount or period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInput {
    period: BillingPeriod,
    amount: Decimal,
    payment_mode: PaymentMode,
    remarks: Option<String>,
}

impl PaymentInput {
    /// Validates and builds a payment input.
    ///
    /// # Errors
    ///
    /// Returns `FeeError::InvalidAmount` if `amount <= 0` or above
    /// [`MAX_AMOUNT`], and `FeeError::InvalidYear` if the period's year is
    /// out of range.
    pub fn new(
        period: BillingPeriod,
        amount: Decimal,
        payment_mode: PaymentMode,
        remarks: Option<String>,
    ) -> Result<Self, FeeError> {
        if amount <= Decimal::ZERO || amount > MAX_AMOUNT {
            return Err(FeeError::InvalidAmount(amount));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&period.year) {
            return Err(FeeError::InvalidYear(period.year));
        }
        let remarks = remarks
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        Ok(Self {
            period,
            amount,
            payment_mode,
            remarks,
        })
    }

    /// Period the payment settles.
    #[must_use]
    pub const fn period(&self) -> BillingPeriod {
        self.period
    }

    /// Amount paid.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// How the payment was made.
    #[must_use]
    pub const fn payment_mode(&self) -> PaymentMode {
        self.payment_mode
    }

    /// Optional note.
    #[must_use]
    pub fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }

    pub(crate) fn into_payment(
        self,
        receipt_number: ReceiptNumber,
        paid_date: DateTime<Utc>,
    ) -> Payment {
        Payment {
            period: self.period,
            amount: self.amount,
            paid_date,
            payment_mode: self.payment_mode,
            receipt_number,
            remarks: self.remarks,
        }
    }
}

/// Loosely typed payment request body as submitted by a form.
///
/// Form posts send `year` either as a number or as text such as `"2024"`.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Month name.
    pub month: Option<String>,
    /// Year, as a number or numeric text.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub year: Option<i32>,
    /// Amount paid.
    pub amount: Option<Decimal>,
    /// Payment mode name.
    pub payment_mode: Option<String>,
    /// Optional note.
    pub remarks: Option<String>,
}

impl TryFrom<PaymentRequest> for PaymentInput {
    type Error = FeeError;

    fn try_from(req: PaymentRequest) -> Result<Self, Self::Error> {
        let month_text = req.month.ok_or(FeeError::MissingField("month"))?;
        let year = req.year.ok_or(FeeError::MissingField("year"))?;
        let amount = req.amount.ok_or(FeeError::MissingField("amount"))?;
        let mode_text = req
            .payment_mode
            .ok_or(FeeError::MissingField("paymentMode"))?;

        let month: Month = month_text
            .parse()
            .map_err(|_| FeeError::InvalidMonth(month_text.clone()))?;
        let payment_mode: PaymentMode = mode_text.parse()?;

        Self::new(
            BillingPeriod::new(month, year),
            amount,
            payment_mode,
            req.remarks,
        )
    }
}

/// Outcome of a successful payment recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedPayment {
    /// The payment as persisted.
    pub payment: Payment,
    /// Status of the settled period.
    pub period_status: PeriodStatus,
    /// Balance after the payment.
    pub balance: BalanceSummary,
}
