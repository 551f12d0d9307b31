//! "The Cash In": rent roll, vacancy and collection losses, other income.

use crate::catalog::field::{FieldDefinition, FieldGroup};
use crate::catalog::formula::Calc;
use crate::catalog::types::{FieldValue, Format, Tier, ValueType};
use crate::catalog::BasketConfig;
use crate::error::CatalogError;

pub fn cash_in() -> Result<BasketConfig, CatalogError> {
    let groups = vec![
        FieldGroup::new(
            "rent_roll",
            "Rent Roll",
            Tier::Napkin,
            &[
                "unit_count",
                "market_rent_per_unit",
                "monthly_gross_rent",
                "gross_potential_rent",
            ],
        ),
        FieldGroup::new(
            "losses",
            "Vacancy & Collection",
            Tier::Napkin,
            &[
                "vacancy_pct",
                "vacancy_loss",
                "bad_debt_pct",
                "bad_debt_loss",
                "total_rent_losses",
                "net_rental_income",
            ],
        ),
        FieldGroup::new(
            "other_income",
            "Other Income",
            Tier::Mid,
            &["other_income_monthly", "other_income_annual"],
        ),
        FieldGroup::new(
            "income",
            "Income",
            Tier::Napkin,
            &["effective_gross_income", "rent_growth_pct"],
        ),
    ];

    let fields = vec![
        FieldDefinition::input("unit_count", "Units", ValueType::Number, Tier::Napkin)
            .required()
            .format(Format::number())
            .bounds(1.0, 10_000.0)
            .help("Carried over from The Deal."),
        FieldDefinition::input(
            "market_rent_per_unit",
            "Market Rent / Unit",
            ValueType::Currency,
            Tier::Napkin,
        )
        .required()
        .format(Format::currency())
        .bounds(0.0, 100_000.0)
        .help("Average monthly market rent per unit."),
        FieldDefinition::derived(
            "monthly_gross_rent",
            "Monthly Gross Rent",
            ValueType::Currency,
            Tier::Mid,
            Calc::Product("market_rent_per_unit", "unit_count"),
        )
        .format(Format::currency()),
        FieldDefinition::derived(
            "gross_potential_rent",
            "Gross Potential Rent",
            ValueType::Currency,
            Tier::Napkin,
            Calc::Annualize("monthly_gross_rent"),
        )
        .format(Format::currency())
        .help("All units at market rent, all year."),
        FieldDefinition::input("vacancy_pct", "Vacancy %", ValueType::Percentage, Tier::Napkin)
            .default_value(FieldValue::Percentage(5.0))
            .format(Format::percent())
            .bounds(0.0, 100.0),
        FieldDefinition::derived(
            "vacancy_loss",
            "Vacancy Loss",
            ValueType::Currency,
            Tier::Mid,
            Calc::PercentOf { base: "gross_potential_rent", pct: "vacancy_pct" },
        )
        .format(Format::currency()),
        FieldDefinition::input("bad_debt_pct", "Bad Debt %", ValueType::Percentage, Tier::Pro)
            .default_value(FieldValue::Percentage(0.5))
            .format(Format::percent())
            .bounds(0.0, 20.0)
            .help("Billed but uncollectable rent."),
        FieldDefinition::derived(
            "bad_debt_loss",
            "Bad Debt Loss",
            ValueType::Currency,
            Tier::Pro,
            Calc::PercentOf { base: "gross_potential_rent", pct: "bad_debt_pct" },
        )
        .format(Format::currency()),
        FieldDefinition::derived(
            "total_rent_losses",
            "Total Rent Losses",
            ValueType::Currency,
            Tier::Pro,
            Calc::Sum(vec!["vacancy_loss", "bad_debt_loss"]),
        )
        .format(Format::currency()),
        FieldDefinition::derived(
            "net_rental_income",
            "Net Rental Income",
            ValueType::Currency,
            Tier::Mid,
            Calc::Difference("gross_potential_rent", "total_rent_losses"),
        )
        .format(Format::currency()),
        FieldDefinition::input(
            "other_income_monthly",
            "Other Income / Month",
            ValueType::Currency,
            Tier::Mid,
        )
        .default_value(FieldValue::Currency(0.0))
        .format(Format::currency())
        .bounds(0.0, 1_000_000.0)
        .help("Parking, laundry, storage, fees."),
        FieldDefinition::derived(
            "other_income_annual",
            "Other Income / Year",
            ValueType::Currency,
            Tier::Mid,
            Calc::Annualize("other_income_monthly"),
        )
        .format(Format::currency()),
        FieldDefinition::derived(
            "effective_gross_income",
            "Effective Gross Income",
            ValueType::Currency,
            Tier::Napkin,
            Calc::Sum(vec!["net_rental_income", "other_income_annual"]),
        )
        .format(Format::currency()),
        FieldDefinition::input("rent_growth_pct", "Rent Growth %", ValueType::Percentage, Tier::Mid)
            .default_value(FieldValue::Percentage(3.0))
            .format(Format::percent())
            .bounds(-10.0, 25.0)
            .help("Year-one growth rate; use the stepped schedule for a custom ramp."),
    ];

    BasketConfig::new("cash_in", "The Cash In", groups, fields)
}
