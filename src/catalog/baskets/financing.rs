//! "The Debt": loan sizing, debt service, and coverage.

use crate::catalog::field::{FieldDefinition, FieldGroup};
use crate::catalog::formula::Calc;
use crate::catalog::types::{FieldValue, Format, Tier, ValueType};
use crate::catalog::BasketConfig;
use crate::error::CatalogError;

pub fn financing() -> Result<BasketConfig, CatalogError> {
    let groups = vec![
        FieldGroup::new(
            "sizing",
            "Loan Sizing",
            Tier::Napkin,
            &["total_acquisition_cost", "loan_to_cost_pct", "loan_amount"],
        ),
        FieldGroup::new(
            "terms",
            "Loan Terms",
            Tier::Napkin,
            &["interest_rate_pct", "amortization_years", "interest_only_years"],
        ),
        FieldGroup::new(
            "service",
            "Debt Service",
            Tier::Napkin,
            &["annual_debt_service", "monthly_debt_service"],
        ),
        FieldGroup::new(
            "coverage",
            "Coverage",
            Tier::Mid,
            &["net_operating_income", "dscr"],
        ),
        FieldGroup::new(
            "fees",
            "Lender Fees",
            Tier::Pro,
            &["origination_fee_pct", "origination_fee"],
        ),
    ];

    let fields = vec![
        FieldDefinition::input(
            "total_acquisition_cost",
            "Total Acquisition Cost",
            ValueType::Currency,
            Tier::Napkin,
        )
        .required()
        .format(Format::currency())
        .help("Carried over from The Deal."),
        FieldDefinition::input(
            "loan_to_cost_pct",
            "Loan to Cost %",
            ValueType::Percentage,
            Tier::Napkin,
        )
        .default_value(FieldValue::Percentage(65.0))
        .format(Format::percent())
        .bounds(0.0, 100.0),
        FieldDefinition::derived(
            "loan_amount",
            "Loan Amount",
            ValueType::Currency,
            Tier::Napkin,
            Calc::PercentOf { base: "total_acquisition_cost", pct: "loan_to_cost_pct" },
        )
        .format(Format::currency()),
        FieldDefinition::input(
            "interest_rate_pct",
            "Interest Rate %",
            ValueType::Percentage,
            Tier::Napkin,
        )
        .required()
        .default_value(FieldValue::Percentage(6.5))
        .format(Format { prefix: None, suffix: Some("%"), decimals: 3 })
        .bounds(0.0, 25.0),
        FieldDefinition::input(
            "amortization_years",
            "Amortization (Years)",
            ValueType::Number,
            Tier::Mid,
        )
        .default_value(FieldValue::Number(30.0))
        .format(Format::number())
        .bounds(5.0, 40.0),
        FieldDefinition::input(
            "interest_only_years",
            "Interest-Only (Years)",
            ValueType::Number,
            Tier::Pro,
        )
        .default_value(FieldValue::Number(0.0))
        .format(Format::number())
        .bounds(0.0, 10.0)
        .help("Consumed by the period-by-period projection; does not change the stabilized payment shown here."),
        FieldDefinition::derived(
            "annual_debt_service",
            "Annual Debt Service",
            ValueType::Currency,
            Tier::Napkin,
            Calc::LoanPayment {
                principal: "loan_amount",
                rate_pct: "interest_rate_pct",
                term_years: "amortization_years",
            },
        )
        .format(Format::currency()),
        FieldDefinition::derived(
            "monthly_debt_service",
            "Monthly Payment",
            ValueType::Currency,
            Tier::Mid,
            Calc::MonthlyFrom("annual_debt_service"),
        )
        .format(Format { prefix: Some("$"), suffix: None, decimals: 2 }),
        FieldDefinition::input(
            "net_operating_income",
            "Net Operating Income",
            ValueType::Currency,
            Tier::Mid,
        )
        .format(Format::currency())
        .help("Carried over from The Cash Out."),
        FieldDefinition::derived(
            "dscr",
            "DSCR",
            ValueType::Number,
            Tier::Mid,
            Calc::Quotient("net_operating_income", "annual_debt_service"),
        )
        .format(Format { prefix: None, suffix: Some("x"), decimals: 2 })
        .help("Debt service coverage ratio; lenders typically want 1.20x or better."),
        FieldDefinition::input(
            "origination_fee_pct",
            "Origination Fee %",
            ValueType::Percentage,
            Tier::Pro,
        )
        .default_value(FieldValue::Percentage(1.0))
        .format(Format::percent())
        .bounds(0.0, 5.0),
        FieldDefinition::derived(
            "origination_fee",
            "Origination Fee",
            ValueType::Currency,
            Tier::Pro,
            Calc::PercentOf { base: "loan_amount", pct: "origination_fee_pct" },
        )
        .format(Format::currency()),
    ];

    BasketConfig::new("financing", "The Debt", groups, fields)
}
