//! "The Cash Out": operating expenses down to net operating income.

use crate::catalog::field::{FieldDefinition, FieldGroup};
use crate::catalog::formula::Calc;
use crate::catalog::types::{FieldValue, Format, Tier, ValueType};
use crate::catalog::BasketConfig;
use crate::error::CatalogError;

pub fn cash_out() -> Result<BasketConfig, CatalogError> {
    let groups = vec![
        FieldGroup::new(
            "carryover",
            "Carried Over",
            Tier::Napkin,
            &["effective_gross_income", "purchase_price", "unit_count"],
        ),
        FieldGroup::new(
            "fixed_costs",
            "Taxes & Insurance",
            Tier::Mid,
            &[
                "property_tax_rate_pct",
                "property_taxes",
                "insurance_per_unit",
                "insurance_cost",
            ],
        ),
        FieldGroup::new(
            "operating_costs",
            "Operating Costs",
            Tier::Napkin,
            &[
                "management_fee_pct",
                "management_fee",
                "repairs_per_unit",
                "repairs_cost",
                "payroll_per_unit",
                "payroll_cost",
                "reserves_per_unit",
                "reserves_cost",
                "other_opex",
            ],
        ),
        FieldGroup::new(
            "bottom_line",
            "Bottom Line",
            Tier::Napkin,
            &[
                "total_operating_expenses",
                "expense_ratio_pct",
                "net_operating_income",
                "expense_growth_pct",
            ],
        ),
    ];

    let per_unit_cost = |key, label, tier, default| {
        FieldDefinition::input(key, label, ValueType::Currency, tier)
            .default_value(FieldValue::Currency(default))
            .format(Format::currency())
            .bounds(0.0, 50_000.0)
    };

    let fields = vec![
        FieldDefinition::input(
            "effective_gross_income",
            "Effective Gross Income",
            ValueType::Currency,
            Tier::Napkin,
        )
        .required()
        .format(Format::currency())
        .help("Carried over from The Cash In."),
        FieldDefinition::input("purchase_price", "Purchase Price", ValueType::Currency, Tier::Mid)
            .format(Format::currency())
            .help("Carried over from The Deal; drives the tax bill."),
        FieldDefinition::input("unit_count", "Units", ValueType::Number, Tier::Mid)
            .format(Format::number())
            .bounds(1.0, 10_000.0),
        FieldDefinition::input(
            "property_tax_rate_pct",
            "Property Tax Rate %",
            ValueType::Percentage,
            Tier::Mid,
        )
        .default_value(FieldValue::Percentage(1.2))
        .format(Format::percent())
        .bounds(0.0, 10.0),
        FieldDefinition::derived(
            "property_taxes",
            "Property Taxes",
            ValueType::Currency,
            Tier::Mid,
            Calc::PercentOf { base: "purchase_price", pct: "property_tax_rate_pct" },
        )
        .format(Format::currency()),
        per_unit_cost("insurance_per_unit", "Insurance / Unit", Tier::Mid, 350.0)
            .help("Annual premium per unit."),
        FieldDefinition::derived(
            "insurance_cost",
            "Insurance",
            ValueType::Currency,
            Tier::Mid,
            Calc::Product("insurance_per_unit", "unit_count"),
        )
        .format(Format::currency()),
        FieldDefinition::input(
            "management_fee_pct",
            "Management Fee %",
            ValueType::Percentage,
            Tier::Napkin,
        )
        .default_value(FieldValue::Percentage(4.0))
        .format(Format::percent())
        .bounds(0.0, 15.0),
        FieldDefinition::derived(
            "management_fee",
            "Management Fee",
            ValueType::Currency,
            Tier::Mid,
            Calc::PercentOf { base: "effective_gross_income", pct: "management_fee_pct" },
        )
        .format(Format::currency()),
        per_unit_cost("repairs_per_unit", "Repairs & Maintenance / Unit", Tier::Mid, 500.0),
        FieldDefinition::derived(
            "repairs_cost",
            "Repairs & Maintenance",
            ValueType::Currency,
            Tier::Mid,
            Calc::Product("repairs_per_unit", "unit_count"),
        )
        .format(Format::currency()),
        per_unit_cost("payroll_per_unit", "Payroll / Unit", Tier::Pro, 0.0)
            .help("On-site staff; zero for self-managed properties."),
        FieldDefinition::derived(
            "payroll_cost",
            "Payroll",
            ValueType::Currency,
            Tier::Pro,
            Calc::Product("payroll_per_unit", "unit_count"),
        )
        .format(Format::currency()),
        per_unit_cost("reserves_per_unit", "Replacement Reserves / Unit", Tier::Mid, 250.0),
        FieldDefinition::derived(
            "reserves_cost",
            "Replacement Reserves",
            ValueType::Currency,
            Tier::Mid,
            Calc::Product("reserves_per_unit", "unit_count"),
        )
        .format(Format::currency()),
        FieldDefinition::input("other_opex", "Other Expenses", ValueType::Currency, Tier::Pro)
            .default_value(FieldValue::Currency(0.0))
            .format(Format::currency())
            .bounds(0.0, 10_000_000.0),
        FieldDefinition::derived(
            "total_operating_expenses",
            "Total Operating Expenses",
            ValueType::Currency,
            Tier::Napkin,
            Calc::Sum(vec![
                "property_taxes",
                "insurance_cost",
                "management_fee",
                "repairs_cost",
                "payroll_cost",
                "reserves_cost",
                "other_opex",
            ]),
        )
        .format(Format::currency()),
        FieldDefinition::derived(
            "expense_ratio_pct",
            "Expense Ratio",
            ValueType::Percentage,
            Tier::Mid,
            Calc::RatioPct { num: "total_operating_expenses", den: "effective_gross_income" },
        )
        .format(Format::percent()),
        FieldDefinition::derived(
            "net_operating_income",
            "Net Operating Income",
            ValueType::Currency,
            Tier::Napkin,
            Calc::Difference("effective_gross_income", "total_operating_expenses"),
        )
        .format(Format::currency()),
        FieldDefinition::input(
            "expense_growth_pct",
            "Expense Growth %",
            ValueType::Percentage,
            Tier::Mid,
        )
        .default_value(FieldValue::Percentage(2.5))
        .format(Format::percent())
        .bounds(-10.0, 25.0),
    ];

    BasketConfig::new("cash_out", "The Cash Out", groups, fields)
}
