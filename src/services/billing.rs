//! Money rules shared by jobs, invoices and driver earnings.

use crate::database::models::{
    DispatchType, Driver, DriverEarnings, EarningsLine, EarningsQuery, JobInput, JobType, NewJob,
};
use crate::error::AppError;
use crate::validation::normalize;
use crate::database::repositories::driver::DriverJobRow;

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Billable quantity of a job for its dispatch type, `None` when the job lacks it.
pub fn job_quantity(
    dispatch_type: DispatchType,
    hours: Option<f64>,
    loads: Option<i64>,
    weight: Option<f64>,
) -> Option<f64> {
    match dispatch_type {
        DispatchType::Hourly => hours,
        DispatchType::Load => loads.map(|l| l as f64),
        DispatchType::Tonnage => weight,
        DispatchType::Fixed => Some(1.0),
    }
}

/// Name of the job field that carries the quantity for a dispatch type.
pub fn quantity_field(dispatch_type: DispatchType) -> &'static str {
    match dispatch_type {
        DispatchType::Hourly => "hours",
        DispatchType::Load => "loads",
        DispatchType::Tonnage => "weight",
        DispatchType::Fixed => "quantity",
    }
}

pub fn gross_amount(rate: f64, quantity: f64) -> f64 {
    round_cents(rate * quantity)
}

/// Resolves a job's rate and gross amount against its job type.
pub fn price_job(job_type: &JobType, input: JobInput) -> Result<NewJob, AppError> {
    let rate = input.rate.unwrap_or(job_type.rate);
    let amount = match input.amount {
        Some(amount) => round_cents(amount),
        None => {
            let quantity =
                job_quantity(job_type.dispatch_type, input.hours, input.loads, input.weight)
                    .ok_or_else(|| {
                        AppError::BadRequest(format!(
                            "{} is required for {} jobs",
                            quantity_field(job_type.dispatch_type),
                            job_type.dispatch_type
                        ))
                    })?;
            gross_amount(rate, quantity)
        }
    };

    Ok(NewJob {
        job_date: input.job_date,
        job_type_id: job_type.id,
        driver_id: input.driver_id,
        unit_id: input.unit_id,
        dispatcher_id: input.dispatcher_id,
        ticket_number: normalize(input.ticket_number),
        hours: input.hours,
        loads: input.loads,
        weight: input.weight,
        rate,
        amount,
        notes: normalize(input.notes),
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub commission_percent: f64,
    pub commission: f64,
    pub tax_percent: f64,
    pub tax: f64,
    pub total: f64,
}

impl InvoiceTotals {
    /// Commission comes off the subtotal; tax applies to what is left.
    pub fn compute(
        amounts: impl IntoIterator<Item = f64>,
        commission_percent: f64,
        tax_percent: f64,
    ) -> Self {
        let subtotal = round_cents(amounts.into_iter().sum());
        let commission = round_cents(subtotal * commission_percent / 100.0);
        let taxable = round_cents(subtotal - commission);
        let tax = round_cents(taxable * tax_percent / 100.0);

        Self {
            subtotal,
            commission_percent,
            commission,
            tax_percent,
            tax,
            total: round_cents(taxable + tax),
        }
    }
}

/// Pay for each job at the driver's rate; jobs with no rate pay nothing and are counted.
pub fn driver_earnings(
    driver: &Driver,
    query: &EarningsQuery,
    rows: Vec<DriverJobRow>,
) -> DriverEarnings {
    let mut unrated_jobs = 0;
    let jobs: Vec<EarningsLine> = rows
        .into_iter()
        .map(|row| {
            let quantity =
                job_quantity(row.dispatch_type, row.hours, row.loads, row.weight).unwrap_or(0.0);
            let amount = match row.driver_rate {
                Some(rate) => gross_amount(rate, quantity),
                None => {
                    unrated_jobs += 1;
                    0.0
                }
            };

            EarningsLine {
                job_id: row.job_id,
                job_date: row.job_date,
                job_type_title: row.job_type_title,
                quantity,
                rate: row.driver_rate,
                amount,
            }
        })
        .collect();

    DriverEarnings {
        driver_id: driver.id,
        driver_name: driver.name.clone(),
        start_date: query.start_date,
        end_date: query.end_date,
        total: round_cents(jobs.iter().map(|line| line.amount).sum()),
        jobs,
        unrated_jobs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rounds_to_the_nearest_cent() {
        assert_eq!(round_cents(1.236), 1.24);
        assert_eq!(round_cents(1.234), 1.23);
        assert_eq!(round_cents(-2.346), -2.35);
    }

    #[test]
    fn quantity_follows_dispatch_type() {
        assert_eq!(
            job_quantity(DispatchType::Hourly, Some(8.5), Some(3), Some(20.0)),
            Some(8.5)
        );
        assert_eq!(
            job_quantity(DispatchType::Load, Some(8.5), Some(3), None),
            Some(3.0)
        );
        assert_eq!(
            job_quantity(DispatchType::Tonnage, None, None, Some(31.25)),
            Some(31.25)
        );
        assert_eq!(job_quantity(DispatchType::Fixed, None, None, None), Some(1.0));
        assert_eq!(job_quantity(DispatchType::Hourly, None, Some(3), None), None);
    }

    #[test]
    fn gross_amount_is_rounded() {
        assert_eq!(gross_amount(112.5, 7.75), 871.88);
        assert_eq!(gross_amount(0.0, 12.0), 0.0);
    }

    #[test]
    fn invoice_totals_take_commission_before_tax() {
        let totals = InvoiceTotals::compute([1000.0, 500.0, 250.25], 10.0, 13.0);

        assert_eq!(totals.subtotal, 1750.25);
        assert_eq!(totals.commission, 175.03);
        assert_eq!(totals.tax, 204.78);
        assert_eq!(totals.total, 1780.0);
    }

    fn job_type(dispatch_type: DispatchType, rate: f64) -> JobType {
        JobType {
            id: 11,
            title: "Aggregate delivery".to_string(),
            company_id: 2,
            dispatch_type,
            rate,
            start_location: None,
            end_location: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn job_input(hours: Option<f64>, rate: Option<f64>, amount: Option<f64>) -> JobInput {
        JobInput {
            job_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
            job_type_id: 11,
            driver_id: 1,
            unit_id: 1,
            dispatcher_id: None,
            ticket_number: Some("  ".to_string()),
            hours,
            loads: None,
            weight: None,
            rate,
            amount,
            notes: None,
        }
    }

    #[test]
    fn price_job_defaults_to_the_job_type_rate() {
        let job = price_job(
            &job_type(DispatchType::Hourly, 95.0),
            job_input(Some(7.5), None, None),
        )
        .unwrap();
        assert_eq!(job.rate, 95.0);
        assert_eq!(job.amount, 712.5);
        assert_eq!(job.ticket_number, None);

        let job = price_job(
            &job_type(DispatchType::Hourly, 95.0),
            job_input(Some(2.0), Some(110.0), None),
        )
        .unwrap();
        assert_eq!(job.amount, 220.0);
    }

    #[test]
    fn price_job_keeps_an_explicit_amount() {
        let job = price_job(
            &job_type(DispatchType::Tonnage, 12.0),
            job_input(None, None, Some(1500.0)),
        )
        .unwrap();
        assert_eq!(job.amount, 1500.0);
    }

    #[test]
    fn price_job_requires_the_quantity() {
        let err = price_job(
            &job_type(DispatchType::Hourly, 95.0),
            job_input(None, None, None),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "hours is required for hourly jobs");
    }

    #[test]
    fn driver_earnings_count_unrated_jobs() {
        use chrono::{NaiveDate, Utc};

        let driver = Driver {
            id: 3,
            name: "Marta Kowalski".to_string(),
            email: None,
            phone: None,
            address: None,
            license_number: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let row = |job_id, dispatch_type, hours, loads, driver_rate| DriverJobRow {
            job_id,
            job_date: date,
            job_type_title: "Gravel haul".to_string(),
            dispatch_type,
            hours,
            loads,
            weight: None,
            driver_rate,
        };

        let earnings = driver_earnings(
            &driver,
            &EarningsQuery::default(),
            vec![
                row(1, DispatchType::Hourly, Some(9.5), None, Some(32.0)),
                row(2, DispatchType::Load, None, Some(4), Some(45.125)),
                row(3, DispatchType::Load, None, Some(2), None),
            ],
        );

        assert_eq!(earnings.jobs.len(), 3);
        assert_eq!(earnings.jobs[0].amount, 304.0);
        assert_eq!(earnings.jobs[1].amount, 180.5);
        assert_eq!(earnings.jobs[2].amount, 0.0);
        assert_eq!(earnings.total, 484.5);
        assert_eq!(earnings.unrated_jobs, 1);
        assert_eq!(earnings.driver_name, "Marta Kowalski");
    }

    #[test]
    fn invoice_totals_without_commission_or_tax() {
        let totals = InvoiceTotals::compute([99.99, 0.01], 0.0, 0.0);
        assert_eq!(totals.subtotal, 100.0);
        assert_eq!(totals.commission, 0.0);
        assert_eq!(totals.tax, 0.0);
        assert_eq!(totals.total, 100.0);
    }
}
