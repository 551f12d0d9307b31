//! "The Equity": required equity, cash flow after debt, and the split.

use crate::catalog::field::{FieldDefinition, FieldGroup};
use crate::catalog::formula::Calc;
use crate::catalog::types::{FieldValue, Format, Tier, ValueType};
use crate::catalog::BasketConfig;
use crate::error::CatalogError;

pub fn equity() -> Result<BasketConfig, CatalogError> {
    let groups = vec![
        FieldGroup::new(
            "capital",
            "Capital Stack",
            Tier::Napkin,
            &["total_acquisition_cost", "loan_amount", "equity_required"],
        ),
        FieldGroup::new(
            "returns",
            "Cash Returns",
            Tier::Mid,
            &[
                "net_operating_income",
                "annual_debt_service",
                "annual_cash_flow",
                "cash_on_cash_pct",
            ],
        ),
        FieldGroup::new(
            "waterfall",
            "Waterfall",
            Tier::Pro,
            &["gp_split_pct", "lp_split_pct", "preferred_return_pct"],
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
        FieldDefinition::input("loan_amount", "Loan Amount", ValueType::Currency, Tier::Napkin)
            .required()
            .format(Format::currency())
            .help("Carried over from The Debt."),
        FieldDefinition::derived(
            "equity_required",
            "Equity Required",
            ValueType::Currency,
            Tier::Napkin,
            Calc::Difference("total_acquisition_cost", "loan_amount"),
        )
        .format(Format::currency()),
        FieldDefinition::input(
            "net_operating_income",
            "Net Operating Income",
            ValueType::Currency,
            Tier::Mid,
        )
        .format(Format::currency())
        .help("Carried over from The Cash Out."),
        FieldDefinition::input(
            "annual_debt_service",
            "Annual Debt Service",
            ValueType::Currency,
            Tier::Mid,
        )
        .format(Format::currency())
        .help("Carried over from The Debt."),
        FieldDefinition::derived(
            "annual_cash_flow",
            "Annual Cash Flow",
            ValueType::Currency,
            Tier::Mid,
            Calc::Difference("net_operating_income", "annual_debt_service"),
        )
        .format(Format::currency()),
        FieldDefinition::derived(
            "cash_on_cash_pct",
            "Cash on Cash",
            ValueType::Percentage,
            Tier::Mid,
            Calc::RatioPct { num: "annual_cash_flow", den: "equity_required" },
        )
        .format(Format::percent()),
        FieldDefinition::input("gp_split_pct", "GP Split %", ValueType::Percentage, Tier::Pro)
            .default_value(FieldValue::Percentage(30.0))
            .format(Format::percent())
            .bounds(0.0, 100.0)
            .help("Sponsor share of profits above the preferred return."),
        FieldDefinition::derived(
            "lp_split_pct",
            "LP Split %",
            ValueType::Percentage,
            Tier::Pro,
            Calc::ComplementPct("gp_split_pct"),
        )
        .format(Format::percent()),
        FieldDefinition::input(
            "preferred_return_pct",
            "Preferred Return %",
            ValueType::Percentage,
            Tier::Pro,
        )
        .default_value(FieldValue::Percentage(8.0))
        .format(Format::percent())
        .bounds(0.0, 20.0),
    ];

    BasketConfig::new("equity", "The Equity", groups, fields)
}
