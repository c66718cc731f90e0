//! Stock ledger: applies stock movements to products.

use common::ProductId;
use inventory_store::{EntityStore, NewTransaction, Transaction, TransactionType};

use crate::error::DomainError;
use crate::validation::ValidationErrors;

const NOTES_MAX_LEN: usize = 500;

/// Request to record a stock movement.
///
/// Fields mirror the raw request so that every problem can be reported at
/// once: a missing product, an unknown type and a non-positive quantity are
/// all field issues.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTransaction {
    pub product_id: Option<ProductId>,
    pub transaction_type: String,
    pub quantity: i64,
    pub notes: Option<String>,
}

impl RecordTransaction {
    pub fn new(product_id: ProductId, transaction_type: TransactionType, quantity: i64) -> Self {
        Self {
            product_id: Some(product_id),
            transaction_type: transaction_type.as_str().to_string(),
            quantity,
            notes: None,
        }
    }

    pub fn stock_in(product_id: ProductId, quantity: i64) -> Self {
        Self::new(product_id, TransactionType::In, quantity)
    }

    pub fn stock_out(product_id: ProductId, quantity: i64) -> Self {
        Self::new(product_id, TransactionType::Out, quantity)
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    fn validate(self) -> Result<NewTransaction, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.product_id.is_none() {
            errors.push("productId", "Product is required");
        }

        let transaction_type = match self.transaction_type.trim().parse::<TransactionType>() {
            Ok(t) => Some(t),
            Err(_) => {
                errors.push("type", "Type must be IN or OUT");
                None
            }
        };

        let quantity = errors.count("quantity", "Quantity", self.quantity, 1);

        // Blank notes are stored as absent.
        let notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if let Some(ref n) = notes
            && n.chars().count() > NOTES_MAX_LEN
        {
            errors.push(
                "notes",
                format!("Notes must be at most {NOTES_MAX_LEN} characters"),
            );
        }

        errors.into_result()?;

        match (self.product_id, transaction_type) {
            (Some(product_id), Some(transaction_type)) => Ok(NewTransaction {
                product_id,
                transaction_type,
                quantity,
                notes,
            }),
            _ => Err(ValidationErrors::single("type", "Type must be IN or OUT")),
        }
    }
}

/// Service recording stock movements.
///
/// The product lookup, the stock check, the log append and the stock update
/// all happen inside one store operation, so a rejected movement leaves no
/// trace and an accepted one is never visible half-applied.
pub struct LedgerService<S: EntityStore> {
    store: S,
}

impl<S: EntityStore> LedgerService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates and applies a stock movement, returning the logged transaction.
    ///
    /// Fails with `Validation` on bad input, `NotFound` if the product does
    /// not exist, `InsufficientStock` if a stock-out exceeds what is on hand,
    /// or `StockLimitExceeded` if a stock-in would overflow the stock level.
    #[tracing::instrument(skip(self))]
    pub async fn record_transaction(
        &self,
        cmd: RecordTransaction,
    ) -> Result<Transaction, DomainError> {
        let new_transaction = match cmd.validate() {
            Ok(t) => t,
            Err(e) => {
                metrics::counter!("inventory_transactions_rejected_total", "reason" => "validation")
                    .increment(1);
                return Err(e.into());
            }
        };

        let transaction = match self.store.apply_movement(new_transaction).await {
            Ok(t) => t,
            Err(e) => {
                let err = DomainError::from(e);
                let reason = match &err {
                    DomainError::InsufficientStock { .. } => "insufficient_stock",
                    DomainError::StockLimitExceeded { .. } => "stock_limit",
                    DomainError::NotFound { .. } => "product_not_found",
                    _ => "other",
                };
                metrics::counter!("inventory_transactions_rejected_total", "reason" => reason)
                    .increment(1);
                tracing::warn!(error = %err, "stock movement rejected");
                return Err(err);
            }
        };

        metrics::counter!(
            "inventory_transactions_recorded_total",
            "type" => transaction.transaction_type.as_str()
        )
        .increment(1);
        tracing::info!(
            transaction_id = %transaction.id,
            product_id = %transaction.product_id,
            kind = %transaction.transaction_type,
            quantity = transaction.quantity,
            "stock movement recorded"
        );

        Ok(transaction)
    }
}
