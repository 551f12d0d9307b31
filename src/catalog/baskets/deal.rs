//! "The Deal": purchase terms, timing, and the tax basis split.

use crate::catalog::field::{FieldDefinition, FieldGroup};
use crate::catalog::formula::Calc;
use crate::catalog::types::{FieldValue, Format, Tier, ValueType};
use crate::catalog::BasketConfig;
use crate::error::CatalogError;

pub fn the_deal() -> Result<BasketConfig, CatalogError> {
    let groups = vec![
        FieldGroup::new(
            "basics",
            "Deal Basics",
            Tier::Napkin,
            &[
                "purchase_price",
                "unit_count",
                "acquisition_date",
                "hold_period_years",
                "sale_date",
            ],
        ),
        FieldGroup::new(
            "pricing",
            "Pricing Metrics",
            Tier::Mid,
            &["price_per_unit", "building_sf", "price_per_sf"],
        ),
        FieldGroup::new(
            "closing",
            "Closing",
            Tier::Mid,
            &["closing_cost_pct", "closing_costs", "total_acquisition_cost"],
        ),
        FieldGroup::new(
            "basis",
            "Depreciation Basis",
            Tier::Mid,
            &["land_pct", "improvement_pct", "depreciation_basis"],
        ),
    ];

    let fields = vec![
        FieldDefinition::input("purchase_price", "Purchase Price", ValueType::Currency, Tier::Napkin)
            .required()
            .format(Format::currency())
            .bounds(0.0, 2_000_000_000.0)
            .help("What are you paying for the property?")
            .help_at(Tier::Pro, "Gross purchase price, before closing costs and credits."),
        FieldDefinition::input("unit_count", "Units", ValueType::Number, Tier::Napkin)
            .required()
            .format(Format::number())
            .bounds(1.0, 10_000.0)
            .help("Total number of rentable units."),
        FieldDefinition::input("acquisition_date", "Acquisition Date", ValueType::Date, Tier::Napkin)
            .required()
            .help("Expected closing date."),
        FieldDefinition::input("hold_period_years", "Hold Period (Years)", ValueType::Number, Tier::Napkin)
            .required()
            .default_value(FieldValue::Number(5.0))
            .bounds(1.0, 30.0)
            .help("How long you plan to own before selling."),
        FieldDefinition::derived(
            "sale_date",
            "Projected Sale Date",
            ValueType::Date,
            Tier::Napkin,
            Calc::DateAddYears { date: "acquisition_date", years: "hold_period_years" },
        ),
        FieldDefinition::derived(
            "price_per_unit",
            "Price per Unit",
            ValueType::Currency,
            Tier::Mid,
            Calc::Quotient("purchase_price", "unit_count"),
        )
        .format(Format::currency()),
        FieldDefinition::input("building_sf", "Building SF", ValueType::Number, Tier::Pro)
            .format(Format::number())
            .bounds(1.0, 5_000_000.0)
            .help("Gross building square footage."),
        FieldDefinition::derived(
            "price_per_sf",
            "Price per SF",
            ValueType::Currency,
            Tier::Pro,
            Calc::Quotient("purchase_price", "building_sf"),
        )
        .format(Format { prefix: Some("$"), suffix: None, decimals: 2 }),
        FieldDefinition::input("closing_cost_pct", "Closing Costs %", ValueType::Percentage, Tier::Mid)
            .default_value(FieldValue::Percentage(2.0))
            .format(Format::percent())
            .bounds(0.0, 15.0)
            .help("Legal, title, lender, and diligence costs as a share of price."),
        FieldDefinition::derived(
            "closing_costs",
            "Closing Costs",
            ValueType::Currency,
            Tier::Mid,
            Calc::PercentOf { base: "purchase_price", pct: "closing_cost_pct" },
        )
        .format(Format::currency()),
        FieldDefinition::derived(
            "total_acquisition_cost",
            "Total Acquisition Cost",
            ValueType::Currency,
            Tier::Mid,
            Calc::Sum(vec!["purchase_price", "closing_costs"]),
        )
        .format(Format::currency()),
        FieldDefinition::input("land_pct", "Land %", ValueType::Percentage, Tier::Mid)
            .default_value(FieldValue::Percentage(20.0))
            .format(Format::percent())
            .bounds(0.0, 100.0)
            .help("Share of the price allocated to land (not depreciable)."),
        FieldDefinition::derived(
            "improvement_pct",
            "Improvements %",
            ValueType::Percentage,
            Tier::Mid,
            Calc::ComplementPct("land_pct"),
        )
        .format(Format::percent()),
        FieldDefinition::derived(
            "depreciation_basis",
            "Depreciation Basis",
            ValueType::Currency,
            Tier::Mid,
            Calc::PercentOf { base: "purchase_price", pct: "improvement_pct" },
        )
        .format(Format::currency()),
    ];

    BasketConfig::new("the_deal", "The Deal", groups, fields)
}
