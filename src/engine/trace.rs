//! Audit-trace rendering: a tree showing how a derived field's value flows
//! from its inputs. Exposed to the UI behind an "explain this number"
//! affordance; diagnostic only.

use std::collections::HashMap;
use std::fmt::Write;

use super::values::ValueMap;
use crate::catalog::{BasketConfig, FieldId, FieldValue};
use crate::error::CatalogError;

pub fn format_trace(
    catalog: &BasketConfig,
    values: &ValueMap,
    key: &str,
) -> Result<String, CatalogError> {
    let target = catalog.id_of(key)?;
    let mut tracer = Tracer {
        catalog,
        values,
        visited_at_level: HashMap::new(),
        output: String::new(),
    };

    let _ = writeln!(tracer.output, "AUDIT TRACE for field '{}':", key);
    let _ = writeln!(tracer.output, "--------------------------------------------------");
    tracer.trace_field(target, 1, "");
    Ok(tracer.output)
}

struct Tracer<'a> {
    catalog: &'a BasketConfig,
    values: &'a ValueMap,
    visited_at_level: HashMap<FieldId, usize>,
    output: String,
}

impl<'a> Tracer<'a> {
    fn trace_field(&mut self, id: FieldId, level: usize, prefix: &str) {
        if let Some(&first_seen) = self.visited_at_level.get(&id) {
            let _ = writeln!(self.output, "{}-> (Ref to L{})", prefix, first_seen);
            return;
        }
        self.visited_at_level.insert(id, level);

        let field = self.catalog.field(id);
        let header = format!("[L{}] {}{}", level, field.key, self.format_value(id));

        match &field.calc {
            None => {
                let _ = writeln!(self.output, "{}{} -> Input", prefix, header);
            }
            Some(calc) => {
                let parents = self.catalog.parents(id);
                let refs: Vec<String> = parents
                    .iter()
                    .map(|&p| format!("{}{}", self.catalog.field(p).key, self.format_value(p)))
                    .collect();
                let formula = match refs.len() {
                    2 => format!("{} {} {}", refs[0], calc.symbol(), refs[1]),
                    _ => format!("{}({})", calc.symbol(), refs.join(", ")),
                };
                let _ = writeln!(self.output, "{}{} = {}", prefix, header, formula);

                let stem = prefix.replace("`--", "   ").replace("|--", "|  ");
                for (i, &parent) in parents.iter().enumerate() {
                    let connector = if i == parents.len() - 1 { "`--" } else { "|--" };
                    self.trace_field(parent, level + 1, &format!("{}{}", stem, connector));
                }
            }
        }
    }

    fn format_value(&self, id: FieldId) -> String {
        let field = self.catalog.field(id);
        match self.values.get(id) {
            None => "[?]".to_string(),
            Some(v) => match v {
                FieldValue::Currency(n) | FieldValue::Percentage(n) | FieldValue::Number(n) => {
                    format!("[{}]", field.format.render(*n))
                }
                FieldValue::Date(d) => format!("[{}]", d),
                FieldValue::Text(s) | FieldValue::Choice(s) => format!("[{}]", s),
                FieldValue::Toggle(b) => format!("[{}]", b),
            },
        }
    }
}
