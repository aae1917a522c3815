//! Deduction rate administration.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};
use crate::models::DeductionRate;
use crate::store::RateStoreRef;

/// Fields of a deduction rate to create.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewDeduction {
    /// Unique code, e.g. "EMP_TAX".
    pub code: String,
    /// Unique display name.
    pub name: String,
    /// Fraction of base salary, between 0 and 1.
    pub percentage: Decimal,
}

/// Fields of a deduction rate that may change. The code never does.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeductionUpdate {
    /// New display name.
    pub name: String,
    /// New fraction of base salary, between 0 and 1.
    pub percentage: Decimal,
}

fn validate(field: &str, value: &str) -> PayrollResult<()> {
    if value.trim().is_empty() {
        return Err(PayrollError::InvalidDeduction {
            field: field.to_string(),
            message: "must not be blank".to_string(),
        });
    }
    Ok(())
}

fn validate_percentage(percentage: Decimal) -> PayrollResult<()> {
    if percentage < Decimal::ZERO || percentage > Decimal::ONE {
        return Err(PayrollError::InvalidDeduction {
            field: "percentage".to_string(),
            message: format!("{} is outside 0-1", percentage),
        });
    }
    Ok(())
}

/// CRUD over deduction rates plus startup seeding.
pub struct DeductionService {
    rates: RateStoreRef,
}

impl DeductionService {
    /// Creates a service over `rates`.
    pub fn new(rates: RateStoreRef) -> Self {
        Self { rates }
    }

    /// Creates a rate. Code and name must both be unused.
    pub async fn create(&self, input: NewDeduction) -> PayrollResult<DeductionRate> {
        validate("code", &input.code)?;
        validate("name", &input.name)?;
        validate_percentage(input.percentage)?;

        if self.rates.find_rate_by_code(&input.code).await?.is_some() {
            return Err(PayrollError::conflict(format!(
                "Deduction with code {} already exists",
                input.code
            )));
        }
        if self.rates.find_rate_by_name(&input.name).await?.is_some() {
            return Err(PayrollError::conflict(format!(
                "Deduction with name {} already exists",
                input.name
            )));
        }

        let now = Utc::now();
        let created = self
            .rates
            .insert_rate(DeductionRate {
                id: Uuid::new_v4(),
                code: input.code,
                name: input.name,
                percentage: input.percentage,
                created_at: now,
                updated_at: now,
            })
            .await?;
        info!(code = %created.code, percentage = %created.percentage, "Deduction created");
        Ok(created)
    }

    /// Looks up a rate by id.
    pub async fn get(&self, id: Uuid) -> PayrollResult<DeductionRate> {
        self.rates
            .find_rate(id)
            .await?
            .ok_or_else(|| PayrollError::not_found("Deduction", id))
    }

    /// Looks up a rate by code.
    pub async fn get_by_code(&self, code: &str) -> PayrollResult<DeductionRate> {
        self.rates
            .find_rate_by_code(code)
            .await?
            .ok_or_else(|| PayrollError::not_found("Deduction", code))
    }

    /// Lists every rate ordered by code.
    pub async fn list(&self) -> PayrollResult<Vec<DeductionRate>> {
        self.rates.list_rates().await
    }

    /// Changes the name and percentage of a rate.
    pub async fn update(&self, id: Uuid, update: DeductionUpdate) -> PayrollResult<DeductionRate> {
        validate("name", &update.name)?;
        validate_percentage(update.percentage)?;

        let mut rate = self.get(id).await?;
        if let Some(holder) = self.rates.find_rate_by_name(&update.name).await? {
            if holder.id != id {
                return Err(PayrollError::conflict(format!(
                    "Deduction with name {} already exists",
                    update.name
                )));
            }
        }

        rate.name = update.name;
        rate.percentage = update.percentage;
        rate.updated_at = Utc::now();
        let updated = self.rates.update_rate(rate).await?;
        info!(code = %updated.code, percentage = %updated.percentage, "Deduction updated");
        Ok(updated)
    }

    /// Deletes a rate. Payslips already computed with it keep their amounts.
    pub async fn delete(&self, id: Uuid) -> PayrollResult<()> {
        let rate = self.get(id).await?;
        self.rates.delete_rate(id).await?;
        info!(code = %rate.code, "Deduction deleted");
        Ok(())
    }

    /// Inserts each seed whose code is not stored yet and returns how many
    /// were added. Existing rates are left as they are.
    pub async fn seed(&self, seeds: impl IntoIterator<Item = NewDeduction>) -> PayrollResult<usize> {
        let mut added = 0;
        for seed in seeds {
            if self.rates.find_rate_by_code(&seed.code).await?.is_some() {
                continue;
            }
            self.create(seed).await?;
            added += 1;
        }
        info!(added, "Deduction rates seeded");
        Ok(added)
    }
}
